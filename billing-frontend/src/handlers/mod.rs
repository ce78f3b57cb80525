pub mod admin;
pub mod app;
pub mod calculator;
pub mod metrics;
pub mod statement;

use axum::http::StatusCode;
use billing_core::ApiError;

/// Status for a fragment reporting a Billing API failure: rejections of the
/// request itself are the user's to fix, everything else is upstream.
fn upstream_status(err: &ApiError) -> StatusCode {
    match err.status() {
        Some(status) if status.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}
