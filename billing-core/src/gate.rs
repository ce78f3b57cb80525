//! Admin gate: PIN-based authorization for the configuration editor.
//!
//! There is no login endpoint. A PIN is considered valid when the Billing API
//! serves a PIN-gated read (the configuration history) with it; any failure
//! of that probe counts as an invalid PIN. The Billing API keeps no login
//! state; the gate is held per browser by the front end.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::api::BillingApi;
use crate::validation::FormError;

/// Header carrying the admin PIN on privileged Billing API calls.
pub const ADMIN_PIN_HEADER: &str = "x-admin-pin";

/// Admin PIN as entered by the user. `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct AdminPin(Secret<String>);

impl AdminPin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(Secret::new(pin.into()))
    }

    /// An empty PIN is rejected before any remote call.
    pub fn parse(raw: &str) -> Result<Self, FormError> {
        if raw.is_empty() {
            return Err(FormError::MissingPin);
        }
        Ok(Self::new(raw))
    }
}

impl ExposeSecret<String> for AdminPin {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

impl Serialize for AdminPin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for AdminPin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(AdminPin::new)
    }
}

/// `Unauthenticated -> Verifying -> Authenticated`, with
/// `Verifying -> Unauthenticated` when the probe fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdminGate {
    #[default]
    Unauthenticated,
    Verifying {
        pin: AdminPin,
    },
    Authenticated {
        pin: AdminPin,
    },
}

impl AdminGate {
    /// Enter `Verifying` with `raw_pin`, returning the PIN to probe with.
    /// An empty PIN leaves the state untouched.
    pub fn begin(&mut self, raw_pin: &str) -> Result<AdminPin, FormError> {
        let pin = AdminPin::parse(raw_pin)?;
        *self = AdminGate::Verifying { pin: pin.clone() };
        Ok(pin)
    }

    /// Settle a verification. Has no effect outside `Verifying`.
    pub fn resolve(&mut self, probe_succeeded: bool) {
        *self = match std::mem::take(self) {
            AdminGate::Verifying { pin } if probe_succeeded => AdminGate::Authenticated { pin },
            AdminGate::Verifying { .. } => AdminGate::Unauthenticated,
            other => other,
        };
    }

    pub fn logout(&mut self) {
        *self = AdminGate::Unauthenticated;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AdminGate::Authenticated { .. })
    }

    /// The PIN to authorize privileged calls with, once authenticated.
    pub fn pin(&self) -> Option<&AdminPin> {
        match self {
            AdminGate::Authenticated { pin } => Some(pin),
            _ => None,
        }
    }
}

/// Run the PIN-gated probe and return the settled gate.
///
/// Replacing the probe with a dedicated authentication endpoint only
/// requires changing this function.
pub async fn verify_pin<A>(api: &A, raw_pin: &str) -> Result<AdminGate, FormError>
where
    A: BillingApi + ?Sized,
{
    let mut gate = AdminGate::default();
    let pin = gate.begin(raw_pin)?;

    match api.config_history(&pin).await {
        Ok(history) => {
            tracing::info!(history_len = history.len(), "Admin PIN verified");
            gate.resolve(true);
        }
        Err(e) => {
            tracing::warn!(error = %e, status = ?e.status(), "Admin PIN verification failed");
            gate.resolve(false);
        }
    }

    Ok(gate)
}
