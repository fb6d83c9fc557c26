//! Request error type
//!
//! Every failure crossing the client boundary collapses into a single
//! [`RequestError`] carrying a user-facing message. There is no separate
//! taxonomy for network, validation, or authorization failures; callers
//! display the message and leave their controls in a retryable state.

use thiserror::Error;

/// The single error kind produced by the client layer.
///
/// For failed HTTP round trips the message is the server-supplied
/// `message` field when present, otherwise `"Request failed"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    /// User-facing error text.
    pub message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Fallback used when the server supplies no message field.
    pub fn request_failed() -> Self {
        Self::new("Request failed")
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("transport error: {}", err);
        Self::new(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_the_display_form() {
        let err = RequestError::new("Campaign name is required");
        assert_eq!(err.to_string(), "Campaign name is required");
    }

    #[test]
    fn fallback_message() {
        assert_eq!(RequestError::request_failed().to_string(), "Request failed");
    }
}
