//! Client error model and user-facing messages.

use serde_json::Value;
use thiserror::Error;

use shelfline_auth::AuthError;
use shelfline_core::DomainError;

/// Shown when the backend gave nothing better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered 401. The session has already been cleared.
    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },

    #[error("API error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ClientError {
    /// HTTP status behind the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for a toast: the backend's `detail` when present, otherwise a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Unauthorized { detail } => detail
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ClientError::Domain(err) => err.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Pull `detail` out of an error body.
///
/// Accepts a plain string or a list of validation entries carrying `msg`;
/// list entries are joined with `"; "`.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let msgs: Vec<&str> = entries
                .iter()
                .filter_map(|e| e.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
