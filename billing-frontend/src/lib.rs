pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use billing_core::BillingApi;
use services::metrics::Metrics;
use std::sync::Arc;

/// Shared application state: the Billing API and the metrics registry.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn BillingApi>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(api: Arc<dyn BillingApi>, metrics: Arc<Metrics>) -> Self {
        Self { api, metrics }
    }
}
