//! Error types for the remote store client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Client Error Enum ==
/// Unified error type for the remote store client.
///
/// The shape normalizer never produces one of these; it degrades to defaults.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request body could not be encoded as JSON
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Connection, TLS, or deadline failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with status >= 400
    #[error("Request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// Response body is not valid JSON
    #[error("Decode failed: {0}")]
    Decode(String),

    /// A cache TTL of zero was supplied to a store operation
    #[error("Invalid TTL: cache entries require a positive TTL")]
    InvalidTtl,

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    // == Retry Classification ==
    /// Returns true when a caller may retry the request with backoff.
    ///
    /// Transport failures and 5xx answers are retryable; 4xx and local
    /// encoding/decoding failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Upstream status code, when the error came from the remote side.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Transport("timed out".to_string()).is_retryable());
        assert!(ClientError::Remote {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Remote {
            status: 404,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Serialization("bad".to_string()).is_retryable());
        assert!(!ClientError::Decode("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_remote_error_display_carries_status_and_body() {
        let err = ClientError::Remote {
            status: 422,
            body: r#"{"description":"bad column"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("bad column"));
        assert_eq!(err.status(), Some(422));
    }
}
