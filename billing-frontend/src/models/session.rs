//! Per-browser state kept in the server-side session.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use billing_core::models::{BillResponse, Configuration};
use billing_core::AdminGate;
use tower_sessions::Session;

use crate::error::AppError;

pub const GATE_KEY: &str = "admin.gate";
pub const ACTIVE_CONFIG_KEY: &str = "admin.config";
pub const BILL_KEY: &str = "bill";

/// Typed access to the billing keys of a [`Session`].
#[derive(Clone)]
pub struct BillingSession(Session);

#[async_trait]
impl<S> FromRequestParts<S> for BillingSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}

impl BillingSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    pub async fn gate(&self) -> Result<AdminGate, AppError> {
        Ok(self.0.get::<AdminGate>(GATE_KEY).await?.unwrap_or_default())
    }

    pub async fn set_gate(&self, gate: &AdminGate) -> Result<(), AppError> {
        self.0.insert(GATE_KEY, gate).await?;
        Ok(())
    }

    /// The active configuration last shown on the admin panel.
    pub async fn active_config(&self) -> Result<Option<Configuration>, AppError> {
        Ok(self.0.get::<Configuration>(ACTIVE_CONFIG_KEY).await?)
    }

    pub async fn set_active_config(&self, config: &Configuration) -> Result<(), AppError> {
        self.0.insert(ACTIVE_CONFIG_KEY, config).await?;
        Ok(())
    }

    /// Drop the gate and every cached admin value.
    pub async fn clear_admin(&self) -> Result<(), AppError> {
        self.0.remove::<AdminGate>(GATE_KEY).await?;
        self.0.remove::<Configuration>(ACTIVE_CONFIG_KEY).await?;
        Ok(())
    }

    pub async fn bill(&self) -> Result<Option<BillResponse>, AppError> {
        Ok(self.0.get::<BillResponse>(BILL_KEY).await?)
    }

    pub async fn set_bill(&self, bill: &BillResponse) -> Result<(), AppError> {
        self.0.insert(BILL_KEY, bill).await?;
        Ok(())
    }

    pub async fn clear_bill(&self) -> Result<(), AppError> {
        self.0.remove::<BillResponse>(BILL_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::AdminPin;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> BillingSession {
        BillingSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
    }

    #[tokio::test]
    async fn test_gate_defaults_to_unauthenticated() {
        let session = session();
        assert!(matches!(
            session.gate().await.unwrap(),
            AdminGate::Unauthenticated
        ));
    }

    #[tokio::test]
    async fn test_clear_admin_drops_gate() {
        let session = session();
        session
            .set_gate(&AdminGate::Authenticated {
                pin: AdminPin::new("1234"),
            })
            .await
            .unwrap();
        assert!(session.gate().await.unwrap().is_authenticated());

        session.clear_admin().await.unwrap();

        assert!(!session.gate().await.unwrap().is_authenticated());
        assert!(session.active_config().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_bill_is_none() {
        let session = session();
        assert!(session.bill().await.unwrap().is_none());
        session.clear_bill().await.unwrap();
        assert!(session.bill().await.unwrap().is_none());
    }
}
