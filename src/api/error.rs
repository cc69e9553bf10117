//! Remote API error types.

use thiserror::Error;

/// Errors that can occur when talking to the quiz service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network failure, timeout, 5xx, or a body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// Missing, expired or rejected session token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server rejected the request payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The quiz or attempt does not exist (or is not visible to this user).
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Maps a non-success HTTP status and its body to an error.
    ///
    /// The service answers errors with `{"message": "..."}`; when present
    /// that message is kept, otherwise the raw body is.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.trim().to_string()
            }
        });

        match status {
            401 | 403 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            400 | 409 | 422 => ApiError::Validation(message),
            _ => ApiError::Transport(format!("HTTP {status}: {message}")),
        }
    }

    /// The message carried by the error, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Validation(msg)
            | ApiError::NotFound(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            ApiError::Transport(format!("failed to parse response: {err}"))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
