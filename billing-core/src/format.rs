//! Display formatting. Rounding to two places happens here and nowhere else.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

fn two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1234.50`
pub fn currency(amount: Decimal) -> String {
    format!("${:.2}", two_places(amount))
}

/// `100.00 kWh`
pub fn units(units: Decimal) -> String {
    format!("{:.2} kWh", two_places(units))
}

/// Percentage as configured, without padding: `15%`, `7.5%`.
pub fn percentage(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

/// Percentage padded to two places: `15.00%`.
pub fn percentage_fixed(value: Decimal) -> String {
    format!("{:.2}%", two_places(value))
}

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
