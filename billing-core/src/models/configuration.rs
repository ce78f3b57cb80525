//! Billing configuration as owned by the Billing API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A billing configuration record.
///
/// Exactly one record is active at a time; superseded records are kept by the
/// Billing API as history. The front end only ever holds a read-only copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: String,
    pub rate_per_unit: Decimal,
    pub vat_percentage: Decimal,
    pub fixed_service_charge: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /api/admin/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_per_unit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fixed_service_charge: Decimal,
}

impl Configuration {
    /// True when this record carries exactly the values of `update`.
    pub fn matches(&self, update: &ConfigUpdate) -> bool {
        self.rate_per_unit == update.rate_per_unit
            && self.vat_percentage == update.vat_percentage
            && self.fixed_service_charge == update.fixed_service_charge
    }
}
