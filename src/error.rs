// --- File: src/error.rs ---

use serde_json::Value;
use thiserror::Error;

/// Raised while building [`AppConfig`](crate::config::AppConfig) at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} env var")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("No booking provider enabled (set USE_ZOOM or USE_GCAL to true)")]
    NoProviderEnabled,
}

/// Every way a booking request can end short of a created resource.
///
/// Each stage of a booking returns `Result<_, BookingError>`; the handler matches once
/// on the outcome and renders the provider's own error envelope.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Use POST")]
    MethodNotAllowed,

    /// Missing or malformed input. Carries the reason shown to the caller.
    #[error("{0}")]
    Validation(String),

    /// The OAuth endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {detail}")]
    TokenExchange { status: u16, detail: String },

    /// The provider rejected the create call.
    #[error(
        "provider returned {status}: {}",
        message.as_deref().unwrap_or("no message")
    )]
    ResourceCreation {
        status: u16,
        message: Option<String>,
        raw: Value,
    },

    /// Transport faults, unparseable provider bodies and anything else unforeseen.
    #[error("{0}")]
    Unexpected(String),
}

impl BookingError {
    pub fn validation(reason: impl Into<String>) -> Self {
        BookingError::Validation(reason.into())
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(e: reqwest::Error) -> Self {
        BookingError::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creation_error_displays_provider_message() {
        let err = BookingError::ResourceCreation {
            status: 400,
            message: Some("Invalid meeting start time.".into()),
            raw: json!({"code": 300}),
        };
        assert_eq!(
            err.to_string(),
            "provider returned 400: Invalid meeting start time."
        );
    }

    #[test]
    fn creation_error_without_message_still_displays() {
        let err = BookingError::ResourceCreation {
            status: 403,
            message: None,
            raw: json!({}),
        };
        assert_eq!(err.to_string(), "provider returned 403: no message");
    }
}
