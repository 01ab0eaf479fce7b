use super::request::ApiResponse;
use crate::error::{Result, UnitrackError};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Extract a human-readable error message from an API error body
///
/// Understands `{"detail": ...}`, `{"error": ...}`, `{"non_field_errors": [...]}`
/// and bare JSON strings; anything else falls back to the raw body.
pub fn extract_error_message(response: &ApiResponse) -> String {
    let text = response.text();

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|value| message_from_value(&value));

    match message {
        Some(message) => message,
        None if text.trim().is_empty() => response
            .status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        None => text,
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }

    for field in ["detail", "error"] {
        if let Some(s) = value.get(field).and_then(|v| v.as_str()) {
            return Some(s.to_string());
        }
    }

    value
        .get("non_field_errors")
        .and_then(|v| v.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|joined| !joined.is_empty())
}

/// Turn a non-success response into an `ApiError`
pub fn ensure_success(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(UnitrackError::ApiError {
            status: response.status.as_u16(),
            message: extract_error_message(&response),
        })
    }
}

/// Decode a successful JSON response body
pub fn parse_json<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    ensure_success(response)?.json()
}
