use std::fmt;

use thiserror::Error;

use banter_types::api::ErrorBody;

/// Uniform error code surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Client-side timeout after the single retry was spent.
    Timeout,
    /// HTTP status from a structured server error.
    Http(u16),
    /// Transport-level failure with a usable message.
    Error,
    /// Anything the other arms could not classify.
    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::Http(status) => write!(f, "{}", status),
            ErrorCode::Error => write!(f, "ERROR"),
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The one error shape services hand to the stores and the UI.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} [{code}]")]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
}

impl ApiError {
    pub fn timeout() -> Self {
        Self {
            message: "The server is busy, please try again.".into(),
            code: ErrorCode::Timeout,
        }
    }

    /// Normalize a non-2xx response. Prefers the server's structured
    /// `detail` body; falls back to a generic message for the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| format!("Request failed with status {}", status));
        Self {
            message,
            code: ErrorCode::Http(status),
        }
    }

    /// Normalize a transport error that was not retried away.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else if err.is_decode() {
            Self {
                message: "Unexpected response from server".into(),
                code: ErrorCode::Unknown,
            }
        } else {
            Self {
                message: err.to_string(),
                code: ErrorCode::Error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_body_wins() {
        let err = ApiError::from_response(422, r#"{"detail":"Title must not be empty"}"#);
        assert_eq!(err.message, "Title must not be empty");
        assert_eq!(err.code, ErrorCode::Http(422));
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(err.code, ErrorCode::Http(500));
        assert!(err.message.contains("500"));
    }

    #[test]
    fn codes_render_like_the_wire_values() {
        assert_eq!(ErrorCode::Timeout.to_string(), "TIMEOUT");
        assert_eq!(ErrorCode::Http(404).to_string(), "404");
        assert_eq!(ErrorCode::Error.to_string(), "ERROR");
        assert_eq!(ErrorCode::Unknown.to_string(), "UNKNOWN");
    }
}
