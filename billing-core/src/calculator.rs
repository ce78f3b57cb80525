//! Bill calculation flow: validate locally, then let the Billing API compute.

use thiserror::Error;

use crate::api::BillingApi;
use crate::error::ApiError;
use crate::models::{BillResponse, CalculateBill};
use crate::validation::{validate_units, FormError};

pub const CALCULATION_FAILED: &str = "Failed to calculate bill. Please try again.";

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CalculationError {
    pub fn user_message(&self) -> String {
        match self {
            CalculationError::Invalid(err) => err.to_string(),
            CalculationError::Api(err) => err.user_message(CALCULATION_FAILED),
        }
    }
}

/// Calculate a bill for the raw units input.
///
/// Invalid input never reaches the API. The bill returned is the server's;
/// a local recomputation is only used to flag inconsistent results.
pub async fn calculate<A>(api: &A, raw_units: &str) -> Result<BillResponse, CalculationError>
where
    A: BillingApi + ?Sized,
{
    let units_consumed = validate_units(raw_units)?;

    let bill = api
        .calculate(&CalculateBill { units_consumed })
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                units_consumed = %units_consumed,
                "Bill calculation failed"
            );
            e
        })?;

    if let Some(deviation) = bill.deviation_from_formula() {
        tracing::warn!(
            units_consumed = %bill.units_consumed,
            total_amount = %bill.total_amount,
            deviation = %deviation,
            "Billing API total deviates from the billing formula"
        );
    }

    tracing::info!(
        units_consumed = %bill.units_consumed,
        total_amount = %bill.total_amount,
        "Bill calculated"
    );
    Ok(bill)
}
