//! HTTP client for the Billing API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::BillingApi;
use crate::config::BillingApiSettings;
use crate::error::ApiError;
use crate::gate::{AdminPin, ADMIN_PIN_HEADER};
use crate::models::{BillResponse, CalculateBill, ConfigUpdate, Configuration};
use crate::observability::inject_trace_headers;

pub struct BillingClient {
    client: Client,
    settings: BillingApiSettings,
}

impl BillingClient {
    pub fn new(settings: BillingApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }

    /// Send with trace context and request id, mapping non-success statuses
    /// to [`ApiError::Rejected`] with the server's message.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers);

        let response = request.headers(headers).send().await.map_err(|e| {
            tracing::error!("Failed to send request to Billing API {}: {}", path, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::warn!(
                path = %path,
                status = %status,
                message = message.as_deref().unwrap_or("-"),
                "Billing API returned an error"
            );
            return Err(ApiError::Rejected { status, message });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to decode Billing API response from {}: {}", path, e);
            ApiError::Decode(e)
        })
    }
}

#[async_trait]
impl BillingApi for BillingClient {
    async fn active_config(&self) -> Result<Configuration, ApiError> {
        let path = "/api/config";
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn update_config(
        &self,
        update: &ConfigUpdate,
        pin: &AdminPin,
    ) -> Result<Configuration, ApiError> {
        let path = "/api/admin/config";
        let request = self
            .client
            .put(self.url(path))
            .header(ADMIN_PIN_HEADER, pin.expose_secret().as_str())
            .json(update);
        self.send(request, path).await
    }

    async fn config_history(&self, pin: &AdminPin) -> Result<Vec<Configuration>, ApiError> {
        let path = "/api/admin/config/history";
        let request = self
            .client
            .get(self.url(path))
            .header(ADMIN_PIN_HEADER, pin.expose_secret().as_str());
        self.send(request, path).await
    }

    async fn calculate(&self, request: &CalculateBill) -> Result<BillResponse, ApiError> {
        let path = "/api/calculate";
        self.send(self.client.post(self.url(path)).json(request), path)
            .await
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

/// Extract `message` from an error body. Validation failures may carry a
/// list of messages, which are joined.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let message = match parsed.message? {
        ErrorMessage::One(message) => message,
        ErrorMessage::Many(messages) => messages.join("; "),
    };
    (!message.trim().is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_single() {
        let body = br#"{"statusCode":400,"message":"Invalid rate","error":"Bad Request"}"#;
        assert_eq!(error_message(body), Some("Invalid rate".to_string()));
    }

    #[test]
    fn test_error_message_list() {
        let body = br#"{"message":["ratePerUnit must be positive","vat too high"]}"#;
        assert_eq!(
            error_message(body),
            Some("ratePerUnit must be positive; vat too high".to_string())
        );
    }

    #[test]
    fn test_error_message_absent() {
        assert_eq!(error_message(b"<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(br#"{"error":"Unauthorized"}"#), None);
        assert_eq!(error_message(br#"{"message":""}"#), None);
        assert_eq!(error_message(b""), None);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = BillingClient::new(BillingApiSettings {
            url: "http://billing.local/".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        assert_eq!(client.url("/api/config"), "http://billing.local/api/config");
    }
}
