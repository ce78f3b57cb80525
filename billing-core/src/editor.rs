//! Configuration editor flow.

use thiserror::Error;

use crate::api::BillingApi;
use crate::error::ApiError;
use crate::gate::AdminPin;
use crate::models::Configuration;
use crate::validation::{ConfigForm, FormError};

pub const UPDATE_FAILED: &str = "Failed to update configuration";
pub const LOAD_FAILED: &str = "Failed to load current configuration";
pub const UPDATED: &str = "Configuration updated successfully!";

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{} configuration field(s) failed validation", .0.len())]
    Invalid(Vec<FormError>),

    #[error(transparent)]
    Rejected(ApiError),
}

impl EditorError {
    /// Messages to show the administrator, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            EditorError::Invalid(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
            EditorError::Rejected(err) => vec![err.user_message(UPDATE_FAILED)],
        }
    }
}

/// Outcome of an accepted update.
#[derive(Debug)]
pub struct Submitted {
    /// The record the Billing API created.
    pub updated: Configuration,
    /// The active configuration fetched right after the update.
    pub refreshed: Result<Configuration, ApiError>,
}

/// Validate `form`, submit it with `pin` and refetch the active configuration.
///
/// Nothing is sent when validation fails.
pub async fn submit<A>(api: &A, pin: &AdminPin, form: &ConfigForm) -> Result<Submitted, EditorError>
where
    A: BillingApi + ?Sized,
{
    let update = form.validate().map_err(EditorError::Invalid)?;

    let updated = api.update_config(&update, pin).await.map_err(|e| {
        tracing::warn!(error = %e, status = ?e.status(), "Configuration update rejected");
        EditorError::Rejected(e)
    })?;

    tracing::info!(
        configuration_id = %updated.id,
        rate_per_unit = %updated.rate_per_unit,
        vat_percentage = %updated.vat_percentage,
        fixed_service_charge = %updated.fixed_service_charge,
        "Configuration updated"
    );

    let refreshed = api.active_config().await;
    match &refreshed {
        Ok(active) if !active.matches(&update) => {
            tracing::warn!(
                configuration_id = %active.id,
                "Active configuration differs from the submitted values"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Failed to refetch configuration after update"),
    }

    Ok(Submitted { updated, refreshed })
}
