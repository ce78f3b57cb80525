use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::AppState;

/// Path label for requests that matched no route.
const UNMATCHED: &str = "unmatched";

pub async fn metrics_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED, MatchedPath::as_str)
        .to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    state
        .metrics
        .observe_request(&method, &path, &status, start.elapsed().as_secs_f64());

    response
}
