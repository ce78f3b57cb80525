//! Stub Billing API served over HTTP, backed by the in-memory implementation.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use billing_core::gate::ADMIN_PIN_HEADER;
use billing_core::models::{CalculateBill, ConfigUpdate};
use billing_core::rust_decimal::Decimal;
use billing_core::{ApiError, AdminPin, BillingApi, InMemoryBillingApi};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const TEST_PIN: &str = "1234";

/// Stub server state: the in-memory API plus the last request id seen.
pub struct Stub {
    pub api: InMemoryBillingApi,
    pub last_request_id: Mutex<Option<String>>,
}

pub struct StubServer {
    pub url: String,
    pub stub: Arc<Stub>,
}

pub fn reference_config() -> ConfigUpdate {
    ConfigUpdate {
        rate_per_unit: Decimal::new(50, 2),
        vat_percentage: Decimal::new(15, 0),
        fixed_service_charge: Decimal::new(500, 2),
    }
}

impl StubServer {
    pub async fn spawn() -> Self {
        let stub = Arc::new(Stub {
            api: InMemoryBillingApi::new(TEST_PIN, reference_config()),
            last_request_id: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/config", get(active_config))
            .route("/api/admin/config", put(update_config))
            .route("/api/admin/config/history", get(config_history))
            .route("/api/calculate", post(calculate))
            .with_state(stub.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            stub,
        }
    }
}

fn error_response(err: ApiError) -> Response {
    let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match err.server_message() {
        Some(message) => (status, Json(serde_json::json!({ "message": message }))).into_response(),
        None => (status, "upstream unavailable").into_response(),
    }
}

fn pin(headers: &HeaderMap) -> AdminPin {
    AdminPin::new(
        headers
            .get(ADMIN_PIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default(),
    )
}

async fn record_request_id(stub: &Stub, headers: &HeaderMap) {
    let id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    *stub.last_request_id.lock().await = id;
}

async fn active_config(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    record_request_id(&stub, &headers).await;
    match stub.api.active_config().await {
        Ok(config) => Json(config).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_config(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(update): Json<ConfigUpdate>,
) -> Response {
    match stub.api.update_config(&update, &pin(&headers)).await {
        Ok(config) => Json(config).into_response(),
        Err(e) => error_response(e),
    }
}

async fn config_history(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    match stub.api.config_history(&pin(&headers)).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => error_response(e),
    }
}

async fn calculate(State(stub): State<Arc<Stub>>, Json(request): Json<CalculateBill>) -> Response {
    match stub.api.calculate(&request).await {
        Ok(bill) => Json(bill).into_response(),
        Err(e) => error_response(e),
    }
}
