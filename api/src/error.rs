//! Error taxonomy for backend calls. None of these are fatal to the app:
//! callers surface a message and carry on or retry.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timed out).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered outside the 2xx range.
    #[error("server responded {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The response arrived but its payload could not be decoded.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Build a `Status` error, lifting the backend's `detail` message (or
    /// its first field error) out of the body when one is present.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| extract_detail(&body))
            .unwrap_or_else(|| "request rejected".to_string());
        Self::Status { status, detail }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// DRF-style bodies carry either `{"detail": "..."}` or a map of
/// `{"field": ["message", ...]}` validation errors.
fn extract_detail(body: &Value) -> Option<String> {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    let map = body.as_object()?;
    map.iter().find_map(|(field, messages)| {
        let message = match messages {
            Value::String(text) => text.clone(),
            Value::Array(list) => list.first()?.as_str()?.to_string(),
            _ => return None,
        };
        Some(format!("{field}: {message}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_field_wins() {
        let body = json!({"detail": "Invalid credentials"});
        assert_eq!(extract_detail(&body).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn field_errors_are_flattened() {
        let body = json!({"username": ["A user with that username already exists."]});
        assert_eq!(
            extract_detail(&body).as_deref(),
            Some("username: A user with that username already exists.")
        );
    }

    #[test]
    fn unusable_bodies_yield_none() {
        assert!(extract_detail(&json!([1, 2, 3])).is_none());
        assert!(extract_detail(&json!({"count": 3})).is_none());
    }
}
