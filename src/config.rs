//! Client configuration
//!
//! Configuration is loaded once (usually at process start) and handed to the
//! client explicitly. Nothing here touches the network.

use std::collections::HashMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::FileSearchError;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Optional environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
/// Default API endpoint (v1beta, where File Search lives).
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// File Search client configuration
#[derive(Debug, Clone)]
pub struct FileSearchConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL for the API, including the version segment
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl FileSearchConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(120)),
            connect_timeout: Some(Duration::from_secs(10)),
            headers: HashMap::new(),
            user_agent: None,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// Fails with [`FileSearchError::ConfigurationError`] when `GEMINI_API_KEY`
    /// is unset or blank.
    pub fn from_env() -> Result<Self, FileSearchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FileSearchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                FileSearchError::ConfigurationError(format!(
                    "{API_KEY_ENV} environment variable not set"
                ))
            })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connect timeout
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Base URL for media uploads.
    ///
    /// Uploads go through `/upload/<version>` on the same host, so `/upload`
    /// is inserted before the version segment.
    pub fn upload_base_url(&self) -> String {
        let base = &self.base_url;
        if base.contains("/v1beta") {
            base.replacen("/v1beta", "/upload/v1beta", 1)
        } else if base.contains("/v1/") {
            base.replacen("/v1/", "/upload/v1/", 1)
        } else if base.ends_with("/v1") {
            base.replacen("/v1", "/upload/v1", 1)
        } else {
            format!("{}/upload", base.trim_end_matches('/'))
        }
    }

    /// Headers sent with every request (auth included).
    ///
    /// Content-Type is left to the request body (JSON or multipart).
    pub fn build_headers(&self) -> Result<reqwest::header::HeaderMap, FileSearchError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(self.api_key.expose_secret()).map_err(|e| {
            FileSearchError::ConfigurationError(format!("Invalid API key header value: {e}"))
        })?;
        headers.insert("x-goog-api-key", key);
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FileSearchError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                FileSearchError::ConfigurationError(format!("Invalid header value: {e}"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Build the pooled HTTP client for this configuration.
    pub fn build_http_client(&self) -> Result<reqwest::Client, FileSearchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder.build().map_err(|e| {
            FileSearchError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })
    }
}
