//! Bill calculation request and result.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Configuration;

/// Largest gap between a reported total and the formula that is still
/// attributed to rounding on the server side.
pub const FORMULA_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Body of `POST /api/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateBill {
    #[serde(with = "rust_decimal::serde::float")]
    pub units_consumed: Decimal,
}

/// Immutable snapshot of a bill for one units figure and the configuration
/// active when it was computed. Values are stored unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub units_consumed: Decimal,
    pub rate_per_unit: Decimal,
    pub subtotal: Decimal,
    pub vat_percentage: Decimal,
    pub vat_amount: Decimal,
    pub fixed_service_charge: Decimal,
    pub total_amount: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl BillResponse {
    /// Apply the billing formula:
    ///
    /// ```text
    /// subtotal     = units * rate
    /// vat_amount   = subtotal * vat / 100
    /// total_amount = subtotal + vat_amount + fixed_service_charge
    /// ```
    ///
    /// Returns `None` when an intermediate value leaves the decimal range.
    pub fn compute(
        units_consumed: Decimal,
        config: &Configuration,
        calculated_at: DateTime<Utc>,
    ) -> Option<Self> {
        let (subtotal, vat_amount, total_amount) = apply_formula(
            units_consumed,
            config.rate_per_unit,
            config.vat_percentage,
            config.fixed_service_charge,
        )?;

        Some(Self {
            units_consumed,
            rate_per_unit: config.rate_per_unit,
            subtotal,
            vat_percentage: config.vat_percentage,
            vat_amount,
            fixed_service_charge: config.fixed_service_charge,
            total_amount,
            calculated_at,
        })
    }

    /// Distance between the reported total and the formula applied to the
    /// reported inputs, when it exceeds [`FORMULA_TOLERANCE`].
    pub fn deviation_from_formula(&self) -> Option<Decimal> {
        let (_, _, expected) = apply_formula(
            self.units_consumed,
            self.rate_per_unit,
            self.vat_percentage,
            self.fixed_service_charge,
        )?;

        let deviation = expected.checked_sub(self.total_amount)?.abs();
        (deviation > FORMULA_TOLERANCE).then_some(deviation)
    }
}

fn apply_formula(
    units: Decimal,
    rate: Decimal,
    vat_percentage: Decimal,
    fixed_service_charge: Decimal,
) -> Option<(Decimal, Decimal, Decimal)> {
    let subtotal = units.checked_mul(rate)?;
    let vat_amount = subtotal
        .checked_mul(vat_percentage)?
        .checked_div(Decimal::ONE_HUNDRED)?;
    let total = subtotal
        .checked_add(vat_amount)?
        .checked_add(fixed_service_charge)?;
    Some((subtotal, vat_amount, total))
}
