use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the Billing API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("Billing API rejected the request with status {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Billing API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Billing API response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ApiError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(err) | ApiError::Decode(err) => err.status(),
        }
    }

    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server's message verbatim, or `fallback` when it sent none.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}
