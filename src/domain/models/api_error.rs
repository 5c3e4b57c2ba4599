#[cfg(test)]
#[path = "api_error_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_json::Value;

/// A non-2xx response from the knowledge base service.
#[derive(Debug, thiserror::Error)]
#[error("request failed with status code {status}")]
pub struct ApiError {
    pub status: u16,
    pub detail: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

impl ApiError {
    /// Builds an error from a response body, picking up a FastAPI style
    /// `{"detail": ...}` payload when there is one.
    pub fn from_body(status: u16, body: &str) -> ApiError {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| return e.detail)
            .and_then(|detail| {
                match detail {
                    Value::Null => return None,
                    Value::String(text) => return Some(text),
                    other => return Some(other.to_string()),
                }
            })
            .filter(|detail| return !detail.trim().is_empty());

        return ApiError { status, detail };
    }
}

/// The backend provided `detail` of a failed request, if any.
pub fn error_detail(err: &anyhow::Error) -> Option<String> {
    return err
        .downcast_ref::<ApiError>()
        .and_then(|api_err| return api_err.detail.clone());
}

/// The backend `detail` when present, otherwise `fallback`.
pub fn detail_or(err: &anyhow::Error, fallback: &str) -> String {
    return error_detail(err).unwrap_or_else(|| return fallback.to_string());
}
