//! Shared HTTP execution
//!
//! Every remote call goes through [`HttpExecutor`]: auth headers, interceptor
//! hooks, status classification and JSON decoding live here so the client
//! operations stay one-liners over the REST surface.

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{FileSearchError, classify_http_error};
use crate::retry::{RetryPolicy, maybe_retry};
use crate::utils::http_interceptor::{HttpInterceptor, HttpRequestContext};

#[derive(Clone)]
pub(crate) struct HttpExecutor {
    client: reqwest::Client,
    headers: HeaderMap,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    retry_policy: Option<RetryPolicy>,
}

impl HttpExecutor {
    pub(crate) fn new(
        client: reqwest::Client,
        headers: HeaderMap,
        interceptors: Vec<Arc<dyn HttpInterceptor>>,
        retry_policy: Option<RetryPolicy>,
    ) -> Self {
        Self {
            client,
            headers,
            interceptors,
            retry_policy,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
    ) -> Result<T, FileSearchError> {
        let ctx = &self.context(operation, Method::GET, url);
        maybe_retry(self.retry_policy.as_ref(), || async move {
            let resp = self.execute(ctx, self.client.get(url)).await?;
            decode_json(resp, operation).await
        })
        .await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, FileSearchError> {
        let ctx = &self.context(operation, Method::POST, url);
        maybe_retry(self.retry_policy.as_ref(), || async move {
            let resp = self.execute(ctx, self.client.post(url).json(body)).await?;
            decode_json(resp, operation).await
        })
        .await
    }

    /// DELETE; the (usually empty) response body is discarded.
    pub(crate) async fn delete(
        &self,
        operation: &'static str,
        url: &str,
    ) -> Result<(), FileSearchError> {
        let ctx = &self.context(operation, Method::DELETE, url);
        maybe_retry(self.retry_policy.as_ref(), || async move {
            self.execute(ctx, self.client.delete(url)).await?;
            Ok(())
        })
        .await
    }

    /// Multipart POST. Never retried: the form is consumed by the send.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, FileSearchError> {
        let ctx = self.context(operation, Method::POST, url);
        let resp = self
            .execute(&ctx, self.client.post(url).multipart(form))
            .await?;
        decode_json(resp, operation).await
    }

    fn context(&self, operation: &'static str, method: Method, url: &str) -> HttpRequestContext {
        HttpRequestContext {
            operation,
            method,
            url: url.to_string(),
        }
    }

    async fn execute(
        &self,
        ctx: &HttpRequestContext,
        builder: RequestBuilder,
    ) -> Result<Response, FileSearchError> {
        let mut rb = builder.headers(self.headers.clone());
        for itc in &self.interceptors {
            rb = itc.on_before_send(ctx, rb)?;
        }

        let result = send_checked(rb).await;
        match &result {
            Ok(resp) => {
                for itc in &self.interceptors {
                    itc.on_response(ctx, resp.status());
                }
            }
            Err(err) => {
                for itc in &self.interceptors {
                    itc.on_error(ctx, err);
                }
            }
        }
        result
    }
}

async fn send_checked(rb: RequestBuilder) -> Result<Response, FileSearchError> {
    let resp = rb.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let headers = resp.headers().clone();
    let text = error_body(resp.text().await);
    Err(classify_http_error(status.as_u16(), &text, &headers))
}

/// Body of an error response, or the reason it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<body unreadable: {e}>"))
}

async fn decode_json<T: DeserializeOwned>(
    resp: Response,
    operation: &str,
) -> Result<T, FileSearchError> {
    let raw = resp.bytes().await?;
    // Some endpoints answer with an empty body on success
    let bytes: &[u8] = if raw.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &raw
    };
    serde_json::from_slice::<T>(bytes)
        .map_err(|e| FileSearchError::ParseError(format!("{operation}: {e}")))
}
