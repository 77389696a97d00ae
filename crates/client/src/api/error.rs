//! Errors raised at the REST client boundary.

use healthy_food_core::FilterError;
use thiserror::Error;

/// Fallback text when nothing more specific is known about a failure.
pub const GENERIC_FAILURE: &str = "Please try again.";

/// Errors that can occur when talking to the backend.
///
/// Every failure a client sees is one of these. The orchestration layer
/// turns them into user-facing notifications; they never reach the
/// presentation layer as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network or connection failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success status, or a body carrying an explicit `error` field.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the body's `error` field, if any.
        message: Option<String>,
    },

    /// Body could not be parsed into the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Request rejected before it was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] FilterError),
}

impl ApiError {
    /// The message the server supplied, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Human-readable description suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        match self {
            Self::Server { status, .. } if !(200..300).contains(status) => {
                format!("HTTP error! status: {status}")
            }
            Self::InvalidInput(err) => err.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Server {
            status: 408,
            message: Some("Search timed out.".to_string()),
        };
        assert_eq!(err.user_message(), "Search timed out.");
    }

    #[test]
    fn test_user_message_falls_back_to_status() {
        let err = ApiError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), "HTTP error! status: 502");
    }

    #[test]
    fn test_user_message_generic_fallback() {
        assert_eq!(
            ApiError::Transport("connection refused".to_string()).user_message(),
            GENERIC_FAILURE
        );
        assert_eq!(
            ApiError::Malformed("expected value".to_string()).user_message(),
            GENERIC_FAILURE
        );
    }

    #[test]
    fn test_display() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "Server error (500): no details");
    }
}
