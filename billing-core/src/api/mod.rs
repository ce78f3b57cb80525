//! The Billing API seam.
//!
//! Handlers and flows depend on [`BillingApi`] rather than on the HTTP
//! client, so the in-memory implementation can stand in for the remote
//! service.

pub mod memory;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::gate::AdminPin;
use crate::models::{BillResponse, CalculateBill, ConfigUpdate, Configuration};

pub use memory::{CallCounts, InMemoryBillingApi};

/// Operations exposed by the Billing API.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// `GET /api/config`: the active configuration. No authorization.
    async fn active_config(&self) -> Result<Configuration, ApiError>;

    /// `PUT /api/admin/config`: supersede the active configuration.
    async fn update_config(
        &self,
        update: &ConfigUpdate,
        pin: &AdminPin,
    ) -> Result<Configuration, ApiError>;

    /// `GET /api/admin/config/history`: past configurations, newest first.
    async fn config_history(&self, pin: &AdminPin) -> Result<Vec<Configuration>, ApiError>;

    /// `POST /api/calculate`.
    async fn calculate(&self, request: &CalculateBill) -> Result<BillResponse, ApiError>;
}
