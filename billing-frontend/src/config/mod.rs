use billing_core::config::{BillingApiSettings, TelemetrySettings};
use config::ConfigError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub billing_api: BillingApiSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if self.billing_api.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "billing_api.timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.billing_api.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "billing_api.url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    // Support running from the workspace root or from the crate directory
    let configuration_directory = if base_path.ends_with("billing-frontend") {
        base_path.join("config")
    } else {
        base_path.join("billing-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(port: u16, timeout_seconds: u64) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port,
                secure_cookies: false,
            },
            billing_api: BillingApiSettings {
                url: "http://localhost:3000".to_string(),
                timeout_seconds,
            },
            telemetry: TelemetrySettings::default(),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings(8080, 10).validate().is_ok());
    }

    #[test]
    fn test_zero_port_is_rejected() {
        assert!(settings(0, 10).validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(settings(8080, 0).validate().is_err());
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let settings = config::Config::builder()
            .set_override("server.host", "127.0.0.1")
            .unwrap()
            .set_override("server.port", 9000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap();

        assert!(!settings.server.secure_cookies);
        assert_eq!(settings.billing_api.timeout_seconds, 10);
        assert_eq!(settings.telemetry.log_level, "info");
        assert!(settings.telemetry.otlp_endpoint.is_none());
    }
}
