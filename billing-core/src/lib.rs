//! billing-core: billing domain, validation, admin gate and Billing API client
//! shared by the utility billing front end.
pub mod api;
pub mod calculator;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod gate;
pub mod models;
pub mod observability;
pub mod validation;

pub use api::{BillingApi, InMemoryBillingApi};
pub use client::BillingClient;
pub use error::ApiError;
pub use gate::{AdminGate, AdminPin};
pub use validation::{ConfigForm, FormError};

pub use rust_decimal;
