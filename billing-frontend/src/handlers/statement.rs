use axum::{
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::error::AppError;
use crate::models::BillingSession;
use crate::services::statement;

/// Download the session's bill as a PDF. Without a bill there is nothing to
/// export, so the browser is sent back to the calculator.
pub async fn download_statement(session: BillingSession) -> Result<Response, AppError> {
    let Some(bill) = session.bill().await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let pdf = statement::render(&bill)?;
    let filename = format!("utility-bill-{}.pdf", Utc::now().timestamp_millis());
    tracing::info!(filename = %filename, bytes = pdf.len(), "Bill statement exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    )
        .into_response())
}
