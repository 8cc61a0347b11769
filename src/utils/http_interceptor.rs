//! HTTP Interceptor interfaces
//!
//! Interceptors can observe and tweak request builders before send, observe
//! successful responses and be notified of errors. The hooks are best-effort
//! and should avoid expensive work.

use crate::error::FileSearchError;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    /// Client operation issuing the request, e.g. "create_store"
    pub operation: &'static str,
    pub method: reqwest::Method,
    pub url: String,
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// builder or an error to short-circuit the request.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, FileSearchError> {
        Ok(builder)
    }

    /// Called after a response is received (only for successful responses).
    fn on_response(&self, _ctx: &HttpRequestContext, _status: reqwest::StatusCode) {}

    /// Called when sending or status classification fails.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &FileSearchError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Debug, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, FileSearchError> {
        tracing::debug!(target: "gemini_file_search::http", op = ctx.operation, method = %ctx.method, url = %ctx.url, "sending request");
        Ok(builder)
    }

    fn on_response(&self, ctx: &HttpRequestContext, status: reqwest::StatusCode) {
        tracing::debug!(target: "gemini_file_search::http", op = ctx.operation, url = %ctx.url, status = status.as_u16(), "response received");
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &FileSearchError) {
        tracing::debug!(target: "gemini_file_search::http", op = ctx.operation, url = %ctx.url, err = %error, "request error");
    }
}
