use axum::{extract::State, http::header, response::IntoResponse};

use crate::error::AppError;
use crate::AppState;

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
