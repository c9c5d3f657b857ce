//! Error types for the client layer.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: Some(message.into()),
        }
    }

    /// The server's own message when it sent one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error bodies seen from the API: `{"message": ...}` or `{"error": ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Build an [`ClientError::Api`] from a non-2xx status and raw body text.
pub fn from_error_body(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<'))
                .then(|| trimmed.to_string())
        });
    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_body_is_surfaced() {
        let err = from_error_body(409, r#"{"message":"Booking already accepted"}"#);
        assert_eq!(err.user_message("Delete failed"), "Booking already accepted");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_error_key_is_surfaced() {
        let err = from_error_body(400, r#"{"error":"name required"}"#);
        assert_eq!(err.user_message("Save failed"), "name required");
    }

    #[test]
    fn test_plain_text_body_is_surfaced() {
        let err = from_error_body(502, "upstream down");
        assert_eq!(err.user_message("Save failed"), "upstream down");
    }

    #[test]
    fn test_html_or_empty_body_falls_back() {
        let err = from_error_body(500, "<html>oops</html>");
        assert_eq!(err.user_message("Save failed"), "Save failed");
        let err = from_error_body(500, "");
        assert_eq!(err.user_message("Save failed"), "Save failed");
    }
}
