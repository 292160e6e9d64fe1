//! Error types for Pinforge
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Pinforge operations
///
/// This enum covers configuration loading, storage access, generative
/// provider calls, the Pinterest relay and the publish flow.
#[derive(Error, Debug)]
pub enum PinforgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generative provider errors (API calls, missing key, empty output)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Local storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A required request field is absent
    #[error("{0}")]
    MissingField(String),

    /// The proxy received an action it does not handle
    #[error("Unknown Action")]
    UnknownAction(String),

    /// The Pinterest API answered with a non-success status
    #[error("{message}")]
    Upstream {
        /// HTTP status returned by the upstream API
        status: u16,
        /// Message including whatever body the upstream returned
        message: String,
    },

    /// The pre-signed media upload was rejected
    #[error("Image Upload to Pinterest S3 Failed")]
    UploadFailed {
        /// HTTP status returned by the storage endpoint
        status: u16,
    },

    /// A pin has no generated image yet
    #[error("Please generate an image first.")]
    MissingImage,

    /// A publish sequence for this pin is already running
    #[error("Publish already in progress for pin {0}")]
    PublishInProgress(String),

    /// No pin with the given identifier exists in storage
    #[error("Pin not found: {0}")]
    PinNotFound(String),

    /// A status change would move a pin backwards
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// No Pinterest account is connected
    #[error("No Pinterest account connected. Run `pinforge connect` first.")]
    NotConnected,

    /// Clipboard, download or browser hand-off failures
    #[error("Desktop error: {0}")]
    Desktop(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base64 payload could not be decoded
    #[error("Invalid image data: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl PinforgeError {
    /// HTTP status the proxy reports for this error
    ///
    /// Upstream rejections keep the status the Pinterest API returned,
    /// unknown actions are client errors and everything else is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            PinforgeError::Upstream { status, .. } => *status,
            PinforgeError::UploadFailed { status } => *status,
            PinforgeError::UnknownAction(_) => 400,
            _ => 500,
        }
    }
}

/// Result type alias for Pinforge operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = PinforgeError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_missing_field_display_is_bare_message() {
        let error = PinforgeError::MissingField("Missing Access Token".to_string());
        assert_eq!(error.to_string(), "Missing Access Token");
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_upstream_keeps_status() {
        let error = PinforgeError::Upstream {
            status: 401,
            message: "Pinterest API Error (401): {}".to_string(),
        };
        assert_eq!(error.status_code(), 401);
        assert!(error.to_string().contains("(401)"));
    }

    #[test]
    fn test_upload_failed_is_generic() {
        let error = PinforgeError::UploadFailed { status: 403 };
        assert_eq!(error.to_string(), "Image Upload to Pinterest S3 Failed");
        assert_eq!(error.status_code(), 403);
    }

    #[test]
    fn test_unknown_action_is_client_error() {
        let error = PinforgeError::UnknownAction("delete_pin".to_string());
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = PinforgeError::InvalidTransition {
            from: "published".to_string(),
            to: "scheduled".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: published -> scheduled"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: PinforgeError = io_error.into();
        assert!(matches!(error, PinforgeError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: PinforgeError = json_error.into();
        assert!(matches!(error, PinforgeError::Serialization(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PinforgeError>();
    }
}
