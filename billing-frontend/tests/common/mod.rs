#![allow(dead_code)]

use billing_core::models::ConfigUpdate;
use billing_core::rust_decimal::Decimal;
use billing_core::InMemoryBillingApi;
use billing_frontend::services::metrics::Metrics;
use billing_frontend::startup::build_router;
use billing_frontend::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const ADMIN_PIN: &str = "1234";

/// Front end served on an ephemeral port over an in-memory Billing API.
pub struct TestApp {
    pub address: String,
    pub api: Arc<InMemoryBillingApi>,
    pub metrics: Arc<Metrics>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let api = Arc::new(InMemoryBillingApi::new(
            ADMIN_PIN,
            ConfigUpdate {
                rate_per_unit: Decimal::new(50, 2),
                vat_percentage: Decimal::new(15, 0),
                fixed_service_charge: Decimal::new(500, 2),
            },
        ));
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
        let state = AppState::new(api.clone(), metrics.clone());
        let app = build_router(state, false);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // One browser: cookies persist, redirects are inspected rather than followed
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            address: format!("http://127.0.0.1:{}", port),
            api,
            metrics,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn calculate(&self, units: &str) -> reqwest::Response {
        self.post_form("/calculate", &[("units_consumed", units)]).await
    }

    pub async fn verify_pin(&self, pin: &str) -> reqwest::Response {
        self.post_form("/admin/verify", &[("pin", pin)]).await
    }

    pub async fn update_config(&self, rate: &str, vat: &str, fixed: &str) -> reqwest::Response {
        self.post_form(
            "/admin/config",
            &[
                ("rate_per_unit", rate),
                ("vat_percentage", vat),
                ("fixed_service_charge", fixed),
            ],
        )
        .await
    }

    /// Full admin page load followed by a successful PIN check.
    pub async fn login(&self) {
        self.get("/admin").await;
        let response = self.verify_pin(ADMIN_PIN).await;
        assert_eq!(response.status().as_u16(), 200);
    }
}
