mod support;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use gemini_file_search::config::{API_KEY_ENV, BASE_URL_ENV};
use gemini_file_search::utils::http_interceptor::{HttpInterceptor, HttpRequestContext};
use gemini_file_search::{FileSearchClient, FileSearchConfig, FileSearchError, RetryPolicy};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{config_for, store_json};

#[tokio::test]
async fn missing_credential_fails_without_remote_call() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env: HashMap<&str, String> =
        HashMap::from([(BASE_URL_ENV, format!("{}/v1beta", server.uri()))]);
    let err = FileSearchConfig::from_lookup(|k| env.get(k).cloned())
        .and_then(FileSearchClient::new)
        .unwrap_err();
    assert!(matches!(err, FileSearchError::ConfigurationError(_)));
}

#[tokio::test]
async fn config_from_lookup_drives_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/s1"))
        .and(header("x-goog-api-key", "env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(store_json("fileSearchStores/s1", "S")))
        .expect(1)
        .mount(&server)
        .await;

    let env: HashMap<&str, String> = HashMap::from([
        (API_KEY_ENV, "env-key".to_string()),
        (BASE_URL_ENV, format!("{}/v1beta", server.uri())),
    ]);
    let client = FileSearchClient::new(
        FileSearchConfig::from_lookup(|k| env.get(k).cloned()).expect("config"),
    )
    .expect("client");
    client.get_store("fileSearchStores/s1").await.expect("get");
}

#[tokio::test]
async fn extra_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-goog-user-project", "proj-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        FileSearchClient::new(config_for(&server).with_header("x-goog-user-project", "proj-1"))
            .expect("client");
    client.list_stores_page(None, None).await.expect("list");
}

#[tokio::test]
async fn retry_policy_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/flaky"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(store_json("fileSearchStores/flaky", "F")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FileSearchClient::builder(config_for(&server))
        .with_retry(
            RetryPolicy::new()
                .with_initial_delay(Duration::from_millis(5))
                .with_jitter(false),
        )
        .build()
        .expect("client");
    let store = client.get_store("fileSearchStores/flaky").await.expect("get");
    assert_eq!(store.name, "fileSearchStores/flaky");
}

#[tokio::test]
async fn without_retry_policy_server_error_is_returned_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = FileSearchClient::new(config_for(&server))
        .expect("client")
        .get_store("fileSearchStores/flaky")
        .await
        .unwrap_err();
    assert!(matches!(err, FileSearchError::ApiError { code: 503, .. }));
}

#[derive(Default)]
struct CountingInterceptor {
    sent: AtomicU32,
    ok: AtomicU32,
    failed: AtomicU32,
}

impl HttpInterceptor for CountingInterceptor {
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, FileSearchError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(builder.header("x-intercepted", "1"))
    }

    fn on_response(&self, _ctx: &HttpRequestContext, _status: reqwest::StatusCode) {
        self.ok.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _ctx: &HttpRequestContext, _error: &FileSearchError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn interceptors_observe_requests_and_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/ok"))
        .and(header("x-intercepted", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(store_json("fileSearchStores/ok", "O")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/fileSearchStores/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let counter = Arc::new(CountingInterceptor::default());
    let client = FileSearchClient::builder(config_for(&server))
        .with_interceptor(counter.clone())
        .with_http_logging()
        .build()
        .expect("client");

    client.get_store("fileSearchStores/ok").await.expect("ok");
    let _ = client.get_store("fileSearchStores/gone").await.unwrap_err();

    assert_eq!(counter.sent.load(Ordering::SeqCst), 2);
    assert_eq!(counter.ok.load(Ordering::SeqCst), 1);
    assert_eq!(counter.failed.load(Ordering::SeqCst), 1);
}
