use serde::Deserialize;

/// Billing API base URL baked in at build time through `BILLING_API_URL`,
/// falling back to the local development endpoint.
pub const DEFAULT_API_URL: &str = match option_env!("BILLING_API_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

#[derive(Debug, Deserialize, Clone)]
pub struct BillingApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BillingApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector. Spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
