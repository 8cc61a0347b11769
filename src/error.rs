//! Error Handling Module
//!
//! All fallible operations return [`FileSearchError`]. Remote failures are
//! classified by HTTP status (see [`classify_http_error`]) but never swallowed.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_file_search::error::FileSearchError;
//!
//! let error = FileSearchError::api_error(503, "unavailable");
//! assert!(error.is_retryable());
//! ```

use std::path::PathBuf;

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FileSearchError>;

/// Errors produced by the File Search client.
#[derive(Debug, Clone, Error)]
pub enum FileSearchError {
    /// Missing credential or invalid client configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The local file passed to an upload does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Local I/O failed while reading an upload.
    #[error("IO error: {0}")]
    IoError(String),

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success status returned by the service.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceededError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Request serialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// A long-running operation finished with an error payload.
    #[error("Operation {name} failed (code {code:?}): {message}")]
    OperationFailed {
        name: String,
        code: Option<i32>,
        message: String,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl FileSearchError {
    /// Build an `ApiError` without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Build an `ApiError` carrying structured details.
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// HTTP status associated with this error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            Self::AuthenticationError(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::RateLimitError(_) => Some(429),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { code, .. } => (500..=599).contains(code),
            Self::RateLimitError(_) | Self::HttpError(_) | Self::TimeoutError(_) => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for FileSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for FileSearchError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for FileSearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

/// Classify an HTTP failure into a more specific error.
///
/// The status code drives the mapping; the body is only inspected to tell a
/// quota envelope apart from a plain 400/403. Request ids found in the
/// response headers are appended to the message to aid debugging.
pub fn classify_http_error(status: u16, body_text: &str, headers: &HeaderMap) -> FileSearchError {
    let lower = body_text.to_lowercase();

    let request_ids: Vec<String> = ["x-request-id", "x-goog-request-id", "traceparent"]
        .iter()
        .filter_map(|k| {
            headers
                .get(*k)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{k}={v}"))
        })
        .collect();
    let ids_suffix = if request_ids.is_empty() {
        String::new()
    } else {
        format!(" ids=[{}]", request_ids.join(","))
    };
    // Keep log lines short
    let body_sample = body_text.chars().take(200).collect::<String>();

    match status {
        429 => {
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            return FileSearchError::RateLimitError(format!(
                "http=429 retry_after={retry_after}{ids_suffix} body_sample={body_sample}"
            ));
        }
        401 => {
            return FileSearchError::AuthenticationError(format!(
                "unauthorized{ids_suffix} body_sample={body_sample}"
            ));
        }
        404 => {
            return FileSearchError::NotFound(format!(
                "http=404{ids_suffix} body_sample={body_sample}"
            ));
        }
        413 => {
            return FileSearchError::InvalidInput(format!(
                "http=413 payload too large{ids_suffix} body_sample={body_sample}"
            ));
        }
        415 => {
            return FileSearchError::InvalidInput(format!(
                "http=415 unsupported media type{ids_suffix} body_sample={body_sample}"
            ));
        }
        _ => {}
    }

    if status == 403 || status == 400 {
        if lower.contains("quota") || lower.contains("exceed") {
            return FileSearchError::QuotaExceededError(format!(
                "http={status}{ids_suffix} body_sample={body_sample}"
            ));
        }
        if lower.contains("resource_exhausted") || lower.contains("rate limit") {
            return FileSearchError::RateLimitError(format!(
                "http={status}{ids_suffix} body_sample={body_sample}"
            ));
        }
        if status == 403 {
            return FileSearchError::AuthenticationError(format!(
                "forbidden{ids_suffix} body_sample={body_sample}"
            ));
        }
        return FileSearchError::InvalidInput(format!(
            "bad request{ids_suffix} body_sample={body_sample}"
        ));
    }

    let message = extract_google_error_message(body_text).unwrap_or_else(|| {
        if body_sample.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body_sample.clone()
        }
    });
    let details = match serde_json::from_str::<serde_json::Value>(body_text) {
        Ok(json) => serde_json::json!({
            "status": status,
            "response": json,
            "request_ids": request_ids,
        }),
        Err(_) => serde_json::json!({
            "status": status,
            "raw": body_text,
            "request_ids": request_ids,
        }),
    };
    FileSearchError::api_error_with_details(status, message, details)
}

/// Pull `error.message` out of a Google API error envelope.
fn extract_google_error_message(body_text: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body_text).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}
