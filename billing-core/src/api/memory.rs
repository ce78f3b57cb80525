//! Process-local Billing API.
//!
//! Behaves like the remote service: it re-validates updates, keeps the
//! history of superseded configurations, checks the admin PIN and computes
//! bills with the same formula. Every call is counted so callers can assert
//! which operations actually reached the API.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::BillingApi;
use crate::error::ApiError;
use crate::gate::AdminPin;
use crate::models::{BillResponse, CalculateBill, ConfigUpdate, Configuration};

/// Number of calls received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub active_config: usize,
    pub update_config: usize,
    pub config_history: usize,
    pub calculate: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.active_config + self.update_config + self.config_history + self.calculate
    }
}

#[derive(Debug)]
struct MemoryState {
    /// Oldest first; the last entry is the active one.
    configurations: Vec<Configuration>,
    calls: CallCounts,
    pending_rejection: Option<String>,
    fail_next_active_config: bool,
    unavailable: bool,
}

pub struct InMemoryBillingApi {
    admin_pin: String,
    state: Mutex<MemoryState>,
}

impl InMemoryBillingApi {
    /// Start with `initial` as the active configuration.
    pub fn new(admin_pin: impl Into<String>, initial: ConfigUpdate) -> Self {
        let now = Utc::now();
        let first = Configuration {
            id: Uuid::new_v4().to_string(),
            rate_per_unit: initial.rate_per_unit,
            vat_percentage: initial.vat_percentage,
            fixed_service_charge: initial.fixed_service_charge,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        Self {
            admin_pin: admin_pin.into(),
            state: Mutex::new(MemoryState {
                configurations: vec![first],
                calls: CallCounts::default(),
                pending_rejection: None,
                fail_next_active_config: false,
                unavailable: false,
            }),
        }
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls
    }

    /// Make the next configuration update fail with `message`.
    pub async fn reject_next_update(&self, message: impl Into<String>) {
        self.state.lock().await.pending_rejection = Some(message.into());
    }

    /// Make the next active-configuration read fail with `503`. Other
    /// operations are unaffected.
    pub async fn fail_next_active_config(&self) {
        self.state.lock().await.fail_next_active_config = true;
    }

    /// While set, every operation fails with `503` and no message.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    /// All configurations ever held, oldest first.
    pub async fn configurations(&self) -> Vec<Configuration> {
        self.state.lock().await.configurations.clone()
    }

    fn authorize(&self, pin: &AdminPin) -> Result<(), ApiError> {
        if pin.expose_secret() == &self.admin_pin {
            Ok(())
        } else {
            Err(ApiError::rejected(StatusCode::UNAUTHORIZED, "Invalid admin PIN"))
        }
    }
}

fn unavailable() -> ApiError {
    ApiError::Rejected {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: None,
    }
}

fn active(state: &MemoryState) -> Result<&Configuration, ApiError> {
    state
        .configurations
        .iter()
        .rev()
        .find(|config| config.is_active)
        .ok_or_else(|| ApiError::rejected(StatusCode::NOT_FOUND, "No active configuration found"))
}

#[async_trait]
impl BillingApi for InMemoryBillingApi {
    async fn active_config(&self) -> Result<Configuration, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.active_config += 1;
        if state.unavailable || std::mem::take(&mut state.fail_next_active_config) {
            return Err(unavailable());
        }
        active(&state).cloned()
    }

    async fn update_config(
        &self,
        update: &ConfigUpdate,
        pin: &AdminPin,
    ) -> Result<Configuration, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.update_config += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        self.authorize(pin)?;

        if let Some(message) = state.pending_rejection.take() {
            return Err(ApiError::rejected(StatusCode::BAD_REQUEST, message));
        }

        let violations = update.violations();
        if !violations.is_empty() {
            let message = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::rejected(StatusCode::BAD_REQUEST, message));
        }

        let now = Utc::now();
        for config in state.configurations.iter_mut().filter(|c| c.is_active) {
            config.is_active = false;
            config.updated_at = now;
        }

        let next = Configuration {
            id: Uuid::new_v4().to_string(),
            rate_per_unit: update.rate_per_unit,
            vat_percentage: update.vat_percentage,
            fixed_service_charge: update.fixed_service_charge,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.configurations.push(next.clone());

        tracing::info!(configuration_id = %next.id, "Configuration superseded");
        Ok(next)
    }

    async fn config_history(&self, pin: &AdminPin) -> Result<Vec<Configuration>, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.config_history += 1;
        if state.unavailable {
            return Err(unavailable());
        }
        self.authorize(pin)?;

        Ok(state.configurations.iter().rev().cloned().collect())
    }

    async fn calculate(&self, request: &CalculateBill) -> Result<BillResponse, ApiError> {
        let mut state = self.state.lock().await;
        state.calls.calculate += 1;
        if state.unavailable {
            return Err(unavailable());
        }

        if request.units_consumed <= Decimal::ZERO {
            return Err(ApiError::rejected(
                StatusCode::BAD_REQUEST,
                "Units consumed must be greater than 0",
            ));
        }

        let config = active(&state)?;
        BillResponse::compute(request.units_consumed, config, Utc::now()).ok_or_else(|| {
            ApiError::rejected(StatusCode::BAD_REQUEST, "Units consumed is too large")
        })
    }
}
