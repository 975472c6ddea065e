use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single backend request.
///
/// Every variant renders as a message fit to show to the user.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// The request never produced a response
    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed: unexpected response body ({message})")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid API base URL '{0}'")]
    InvalidUrl(String),
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error bodies the backend is known to send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Message { message: String },
    Nested { error: ErrorDetail },
    Plain { error: String },
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ErrorBody {
    fn into_message(self) -> String {
        match self {
            Self::Message { message } => message,
            Self::Nested { error } => error.message,
            Self::Plain { error } => error,
        }
    }
}

/// Picks the message from a JSON error body, falling back to the status text.
pub(crate) fn error_message(operation: &str, status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(ErrorBody::into_message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "{} failed: {}",
                operation,
                status.canonical_reason().unwrap_or(status.as_str())
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let message = error_message(
            "Upload",
            StatusCode::PAYLOAD_TOO_LARGE,
            r#"{"message":"File exceeds the 50MB limit"}"#,
        );
        assert_eq!(message, "File exceeds the 50MB limit");
    }

    #[test]
    fn test_message_from_nested_error() {
        let message = error_message(
            "Retry",
            StatusCode::CONFLICT,
            r#"{"error":{"key":"NOT_FAILED","message":"File is not in FAILED state"}}"#,
        );
        assert_eq!(message, "File is not in FAILED state");

        let message = error_message("Delete", StatusCode::NOT_FOUND, r#"{"error":"no such file"}"#);
        assert_eq!(message, "no such file");
    }

    #[test]
    fn test_falls_back_to_status_text() {
        let message = error_message("List files", StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(message, "List files failed: Internal Server Error");

        let message = error_message("Upload", StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(message, "Upload failed: Bad Gateway");

        let message = error_message("Upload", StatusCode::BAD_REQUEST, r#"{"message":"  "}"#);
        assert_eq!(message, "Upload failed: Bad Request");
    }

    #[test]
    fn test_status_accessor() {
        let err = RequestError::Status {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "too big".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));
        assert_eq!(err.to_string(), "too big");
        assert_eq!(RequestError::InvalidUrl("x".into()).status(), None);
    }
}
