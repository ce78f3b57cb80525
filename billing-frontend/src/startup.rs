use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    admin::{admin_page, logout_handler, update_config_handler, verify_handler},
    app::health_check,
    calculator::{calculate_handler, index, reset_handler},
    metrics::metrics,
    statement::download_statement,
};
use crate::middleware::{metrics_middleware, request_id_middleware, security_headers_middleware};
use crate::AppState;

pub fn build_router(state: AppState, secure_cookies: bool) -> Router {
    // Sessions live in process memory and end with the browser session
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Strict)
        .with_expiry(Expiry::OnSessionEnd);

    Router::new()
        .route("/", get(index))
        .route("/calculate", post(calculate_handler))
        .route("/reset", post(reset_handler))
        .route("/bill/pdf", get(download_statement))
        .route("/admin", get(admin_page))
        .route("/admin/verify", post(verify_handler))
        .route("/admin/config", post(update_config_handler))
        .route("/admin/logout", post(logout_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn_with_state(state.clone(), metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
