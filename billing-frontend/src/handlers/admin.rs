use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use billing_core::editor::{submit, EditorError, Submitted, LOAD_FAILED, UPDATED};
use billing_core::gate::verify_pin;
use billing_core::models::Configuration;
use billing_core::{ConfigForm, FormError};
use serde::Deserialize;

use super::upstream_status;
use crate::error::{render, AppError};
use crate::models::{BillingSession, ConfigView};
use crate::services::metrics::PinOutcome;
use crate::AppState;

const INVALID_PIN: &str = "Invalid Admin PIN";

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage {
    pub panel: PinPanel,
}

/// PIN entry. The PIN input is always rendered empty.
#[derive(Template)]
#[template(path = "partials/pin_panel.html")]
pub struct PinPanel {
    pub error: Option<String>,
}

/// Current configuration card and the update form.
#[derive(Template)]
#[template(path = "partials/config_panel.html")]
pub struct ConfigPanel {
    pub config: Option<ConfigView>,
    pub form: ConfigForm,
    pub errors: Vec<String>,
    pub success: Option<String>,
}

impl ConfigPanel {
    fn new(config: Option<&Configuration>, form: ConfigForm) -> Self {
        Self {
            config: config.map(ConfigView::from),
            form,
            errors: Vec::new(),
            success: None,
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub pin: String,
}

/// Full admin page load. Always starts unauthenticated with no cached
/// configuration.
pub async fn admin_page(session: BillingSession) -> Result<Response, AppError> {
    session.clear_admin().await?;

    let page = AdminPage {
        panel: PinPanel { error: None },
    };
    Ok(render(&page)?.into_response())
}

pub async fn verify_handler(
    State(state): State<AppState>,
    session: BillingSession,
    Form(payload): Form<VerifyRequest>,
) -> Result<Response, AppError> {
    let gate = match verify_pin(state.api.as_ref(), &payload.pin).await {
        Ok(gate) => gate,
        Err(e) => {
            state.metrics.record_pin_verification(PinOutcome::Missing);
            let panel = PinPanel {
                error: Some(e.to_string()),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&panel)?).into_response());
        }
    };

    session.set_gate(&gate).await?;

    if !gate.is_authenticated() {
        state.metrics.record_pin_verification(PinOutcome::Invalid);
        let panel = PinPanel {
            error: Some(INVALID_PIN.to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, render(&panel)?).into_response());
    }

    state.metrics.record_pin_verification(PinOutcome::Ok);

    let panel = match state.api.active_config().await {
        Ok(config) => {
            session.set_active_config(&config).await?;
            ConfigPanel::new(Some(&config), ConfigForm::from(&config))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load active configuration");
            let mut panel = ConfigPanel::new(None, ConfigForm::default());
            panel.errors.push(LOAD_FAILED.to_string());
            panel
        }
    };

    Ok(render(&panel)?.into_response())
}

pub async fn update_config_handler(
    State(state): State<AppState>,
    session: BillingSession,
    Form(form): Form<ConfigForm>,
) -> Result<Response, AppError> {
    let gate = session.gate().await?;
    let Some(pin) = gate.pin() else {
        tracing::info!("Configuration update attempted without an authenticated gate");
        let panel = PinPanel {
            error: Some(FormError::MissingPin.to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, render(&panel)?).into_response());
    };

    let previous = session.active_config().await?;

    match submit(state.api.as_ref(), pin, &form).await {
        Ok(Submitted { refreshed, .. }) => {
            let mut panel = match refreshed {
                Ok(config) => {
                    session.set_active_config(&config).await?;
                    ConfigPanel::new(Some(&config), ConfigForm::from(&config))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to reload configuration after update");
                    let mut panel = ConfigPanel::new(previous.as_ref(), ConfigForm::default());
                    panel.errors.push(LOAD_FAILED.to_string());
                    panel
                }
            };
            panel.success = Some(UPDATED.to_string());
            Ok(render(&panel)?.into_response())
        }
        Err(e) => {
            let status = match &e {
                EditorError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                EditorError::Rejected(api_error) => upstream_status(api_error),
            };
            let mut panel = ConfigPanel::new(previous.as_ref(), form);
            panel.errors = e.messages();
            Ok((status, render(&panel)?).into_response())
        }
    }
}

pub async fn logout_handler(session: BillingSession) -> Result<Response, AppError> {
    session.clear_admin().await?;
    tracing::info!("Admin logged out");

    Ok(render(&PinPanel { error: None })?.into_response())
}

