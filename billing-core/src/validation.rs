//! Pre-flight validation of free-text form input.
//!
//! These checks only give fast feedback; the Billing API validates again and
//! remains authoritative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ConfigUpdate, Configuration};

/// A user-correctable input problem. The `Display` text is shown verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a valid positive number for units consumed")]
    UnitsConsumed,
    #[error("Rate per unit must be a positive number")]
    RatePerUnit,
    #[error("VAT percentage must be between 0 and 100")]
    VatPercentage,
    #[error("Fixed service charge must be a non-negative number")]
    FixedServiceCharge,
    #[error("Admin PIN is required")]
    MissingPin,
}

impl FormError {
    /// Name of the form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            FormError::UnitsConsumed => "units_consumed",
            FormError::RatePerUnit => "rate_per_unit",
            FormError::VatPercentage => "vat_percentage",
            FormError::FixedServiceCharge => "fixed_service_charge",
            FormError::MissingPin => "pin",
        }
    }
}

/// Parse a free-text amount. Accepts plain decimals (`"0.50"`, `"-3"`) and
/// scientific notation (`"1e3"`); anything else, including digit separators
/// and trailing garbage, is rejected. Values that cannot be held without
/// rounding are rejected too.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if !is_plain_number(raw) {
        return None;
    }

    if raw.contains(['e', 'E']) {
        Decimal::from_scientific(raw).ok()
    } else {
        Decimal::from_str_exact(raw).ok()
    }
}

/// `[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?`
fn is_plain_number(raw: &str) -> bool {
    let (mantissa, exponent) = match raw.find(['e', 'E']) {
        Some(at) => (&raw[..at], Some(&raw[at + 1..])),
        None => (raw, None),
    };

    let mantissa = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (mantissa, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
        return false;
    }

    match exponent {
        Some(exponent) => {
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !digits.is_empty() && all_digits(digits)
        }
        None => true,
    }
}

/// Units consumed must be a number strictly greater than zero.
pub fn validate_units(raw: &str) -> Result<Decimal, FormError> {
    parse_amount(raw)
        .filter(|units| *units > Decimal::ZERO)
        .ok_or(FormError::UnitsConsumed)
}

fn rate_is_valid(rate: &Decimal) -> bool {
    *rate > Decimal::ZERO
}

fn vat_is_valid(vat: &Decimal) -> bool {
    *vat >= Decimal::ZERO && *vat <= Decimal::ONE_HUNDRED
}

fn fixed_charge_is_valid(charge: &Decimal) -> bool {
    *charge >= Decimal::ZERO
}

impl ConfigUpdate {
    /// Every rule this update breaks, in form order.
    pub fn violations(&self) -> Vec<FormError> {
        let mut violations = Vec::new();
        if !rate_is_valid(&self.rate_per_unit) {
            violations.push(FormError::RatePerUnit);
        }
        if !vat_is_valid(&self.vat_percentage) {
            violations.push(FormError::VatPercentage);
        }
        if !fixed_charge_is_valid(&self.fixed_service_charge) {
            violations.push(FormError::FixedServiceCharge);
        }
        violations
    }
}

/// The configuration editor's raw field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigForm {
    #[serde(default)]
    pub rate_per_unit: String,
    #[serde(default)]
    pub vat_percentage: String,
    #[serde(default)]
    pub fixed_service_charge: String,
}

impl ConfigForm {
    /// Validate each field independently. On failure every violated
    /// constraint is reported, not only the first.
    pub fn validate(&self) -> Result<ConfigUpdate, Vec<FormError>> {
        let rate = parse_amount(&self.rate_per_unit).filter(rate_is_valid);
        let vat = parse_amount(&self.vat_percentage).filter(vat_is_valid);
        let fixed = parse_amount(&self.fixed_service_charge).filter(fixed_charge_is_valid);

        match (rate, vat, fixed) {
            (Some(rate_per_unit), Some(vat_percentage), Some(fixed_service_charge)) => {
                Ok(ConfigUpdate {
                    rate_per_unit,
                    vat_percentage,
                    fixed_service_charge,
                })
            }
            (rate, vat, fixed) => {
                let mut violations = Vec::new();
                if rate.is_none() {
                    violations.push(FormError::RatePerUnit);
                }
                if vat.is_none() {
                    violations.push(FormError::VatPercentage);
                }
                if fixed.is_none() {
                    violations.push(FormError::FixedServiceCharge);
                }
                Err(violations)
            }
        }
    }
}

impl From<&Configuration> for ConfigForm {
    fn from(config: &Configuration) -> Self {
        Self {
            rate_per_unit: config.rate_per_unit.normalize().to_string(),
            vat_percentage: config.vat_percentage.normalize().to_string(),
            fixed_service_charge: config.fixed_service_charge.normalize().to_string(),
        }
    }
}
