//! Display-ready values for templates.

use billing_core::format;
use billing_core::models::{BillResponse, Configuration};

#[derive(Debug, Clone)]
pub struct BillView {
    pub calculated_at: String,
    pub units_consumed: String,
    pub rate_per_unit: String,
    pub subtotal: String,
    pub vat_percentage: String,
    pub vat_amount: String,
    pub fixed_service_charge: String,
    pub total_amount: String,
}

impl From<&BillResponse> for BillView {
    fn from(bill: &BillResponse) -> Self {
        Self {
            calculated_at: format::timestamp(&bill.calculated_at),
            units_consumed: format::units(bill.units_consumed),
            rate_per_unit: format!("{}/kWh", format::currency(bill.rate_per_unit)),
            subtotal: format::currency(bill.subtotal),
            vat_percentage: format::percentage(bill.vat_percentage),
            vat_amount: format::currency(bill.vat_amount),
            fixed_service_charge: format::currency(bill.fixed_service_charge),
            total_amount: format::currency(bill.total_amount),
        }
    }
}

/// The "Current Configuration" card.
#[derive(Debug, Clone)]
pub struct ConfigView {
    pub rate_per_unit: String,
    pub vat_percentage: String,
    pub fixed_service_charge: String,
    pub updated_at: String,
}

impl From<&Configuration> for ConfigView {
    fn from(config: &Configuration) -> Self {
        Self {
            rate_per_unit: format!("{}/kWh", format::currency(config.rate_per_unit)),
            vat_percentage: format::percentage_fixed(config.vat_percentage),
            fixed_service_charge: format::currency(config.fixed_service_charge),
            updated_at: format::timestamp(&config.updated_at),
        }
    }
}
