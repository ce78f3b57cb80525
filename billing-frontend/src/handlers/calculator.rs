use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use billing_core::calculator::{calculate, CalculationError};
use serde::Deserialize;

use super::upstream_status;
use crate::error::{render, AppError};
use crate::models::{BillView, BillingSession};
use crate::services::metrics::CalculationOutcome;
use crate::AppState;

#[derive(Template)]
#[template(path = "calculator.html")]
pub struct CalculatorPage {
    pub panel: CalculatorPanel,
}

/// Units form plus, after a successful calculation, the bill breakdown.
#[derive(Template)]
#[template(path = "partials/calculator_panel.html")]
pub struct CalculatorPanel {
    pub units: String,
    pub error: Option<String>,
    pub bill: Option<BillView>,
}

impl CalculatorPanel {
    fn empty() -> Self {
        Self {
            units: String::new(),
            error: None,
            bill: None,
        }
    }
}

#[derive(Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub units_consumed: String,
}

pub async fn index(session: BillingSession) -> Result<Response, AppError> {
    session.clear_bill().await?;

    let page = CalculatorPage {
        panel: CalculatorPanel::empty(),
    };
    Ok(render(&page)?.into_response())
}

pub async fn calculate_handler(
    State(state): State<AppState>,
    session: BillingSession,
    Form(payload): Form<CalculateRequest>,
) -> Result<Response, AppError> {
    session.clear_bill().await?;

    match calculate(state.api.as_ref(), &payload.units_consumed).await {
        Ok(bill) => {
            state.metrics.record_calculation(CalculationOutcome::Ok);
            session.set_bill(&bill).await?;

            let panel = CalculatorPanel {
                units: payload.units_consumed,
                error: None,
                bill: Some(BillView::from(&bill)),
            };
            Ok(render(&panel)?.into_response())
        }
        Err(e) => {
            let (outcome, status) = match &e {
                CalculationError::Invalid(_) => {
                    (CalculationOutcome::Invalid, StatusCode::UNPROCESSABLE_ENTITY)
                }
                CalculationError::Api(api_error) => {
                    (CalculationOutcome::Failed, upstream_status(api_error))
                }
            };
            state.metrics.record_calculation(outcome);

            let panel = CalculatorPanel {
                units: payload.units_consumed,
                error: Some(e.user_message()),
                bill: None,
            };
            Ok((status, render(&panel)?).into_response())
        }
    }
}

pub async fn reset_handler(session: BillingSession) -> Result<Response, AppError> {
    session.clear_bill().await?;
    Ok(render(&CalculatorPanel::empty())?.into_response())
}
