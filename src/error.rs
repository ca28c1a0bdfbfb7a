//! Error taxonomy for the API surface
//!
//! Every request-level failure is one of these variants; the handler boundary
//! converts them into the `{"error": "..."}` JSON envelope.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request (missing key, missing field, bad JSON).
    #[error("{0}")]
    InvalidRequest(String),

    /// Required deployment secrets are absent.
    #[error("{0}")]
    Configuration(String),

    /// SMTP transport or authentication failure, message passed through verbatim.
    #[error("{0}")]
    Delivery(String),

    /// Store file could not be persisted.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Delivery(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::invalid("Missing key").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Configuration("email not configured".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Delivery("connection refused".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passthrough() {
        let err = ApiError::Delivery("535 authentication failed".into());
        assert_eq!(err.to_string(), "535 authentication failed");
    }
}
