//! Error types for the training_core library.

use std::io;
use std::time::Duration;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to the coach whenever the catalog could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading data; please try again";

/// Failures talking to the catalog service
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out after {}s", timeout.as_secs_f32())]
    Timeout { url: String, timeout: Duration },

    /// Connection-level failure (DNS, refused, reset, TLS)
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the catalog shape
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failure injected by an in-memory gateway
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Core error type for training_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalog service could not be reached or answered badly
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A mesocycle, session or exercise id is not in the catalog
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// Programming error: a contract of the progress tracker was broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A navigation action is not valid in the current view
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error came from fetching the catalog.
    ///
    /// A `NotFound` reported by the service is handled like any transport
    /// failure: the dashboard shows the load-failed message and a retry.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::NotFound { .. })
    }

    /// Human-readable text for the notification channel
    pub fn user_message(&self) -> String {
        if self.is_gateway_failure() {
            LOAD_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_failures_share_user_message() {
        let transport = Error::from(TransportError::Unavailable("down".into()));
        let missing = Error::NotFound {
            entity: "mesocycle",
            id: 9,
        };

        assert_eq!(transport.user_message(), LOAD_FAILED_MESSAGE);
        assert_eq!(missing.user_message(), LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_other_errors_keep_their_text() {
        let err = Error::Config("FUT7_BACKEND_URL is not set".into());
        assert!(!err.is_gateway_failure());
        assert!(err.user_message().contains("FUT7_BACKEND_URL"));
    }

    #[test]
    fn test_timeout_display() {
        let err = TransportError::Timeout {
            url: "http://localhost/api/mesociclos".into(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(
            err.to_string(),
            "request to http://localhost/api/mesociclos timed out after 10s"
        );
    }
}
