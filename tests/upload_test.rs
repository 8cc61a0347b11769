mod support;

use std::io::Write;
use std::time::Duration;

use gemini_file_search::prelude::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use support::{client_for, config_for};

const OP_NAME: &str = "fileSearchStores/s1/upload/operations/op-1";

fn pending_op() -> serde_json::Value {
    serde_json::json!({ "name": OP_NAME })
}

fn done_op() -> serde_json::Value {
    serde_json::json!({
        "name": OP_NAME,
        "done": true,
        "response": {
            "@type": "type.googleapis.com/google.ai.generativelanguage.v1main.UploadToFileSearchStoreResponse",
            "documentName": "fileSearchStores/s1/documents/doc-1"
        }
    })
}

fn temp_text_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("dir");
    let missing = dir.path().join("does-not-exist.pdf");

    let err = client_for(&server)
        .upload_file(&missing, "fileSearchStores/s1", None, None)
        .await
        .unwrap_err();
    match err {
        FileSearchError::FileNotFound(p) => assert_eq!(p, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn directory_is_not_an_uploadable_file() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("dir");
    let err = client_for(&server)
        .upload_file(dir.path(), "fileSearchStores/s1", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FileSearchError::FileNotFound(_)));
}

#[tokio::test]
async fn upload_polls_until_done_and_returns_final_operation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/upload/v1beta/fileSearchStores/s1:uploadToFileSearchStore",
        ))
        .and(query_param("uploadType", "multipart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .expect(1)
        .mount(&server)
        .await;
    // Two not-done answers, then done
    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{OP_NAME}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{OP_NAME}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(done_op()))
        .expect(1)
        .mount(&server)
        .await;

    let file = temp_text_file("Tokens expire after 1 hour.");
    let op = client_for(&server)
        .upload_file(
            file.path(),
            "fileSearchStores/s1",
            Some("Auth Guide"),
            Some(vec![CustomMetadata::string("category", "api-docs")]),
        )
        .await
        .expect("upload");

    let expected: Operation = serde_json::from_value(done_op()).unwrap();
    assert_eq!(op, expected);
    assert_eq!(op.document_name(), Some("fileSearchStores/s1/documents/doc-1"));
}

#[tokio::test]
async fn upload_sends_metadata_and_file_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/upload/v1beta/fileSearchStores/s1:uploadToFileSearchStore",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(done_op()))
        .expect(1)
        .mount(&server)
        .await;

    let file = temp_text_file("hello file search");
    client_for(&server)
        .upload_file(
            file.path(),
            "fileSearchStores/s1",
            Some("Greeting"),
            Some(vec![CustomMetadata::numeric("year", 2024.0)]),
        )
        .await
        .expect("upload");

    let requests: Vec<Request> = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#""displayName":"Greeting""#));
    assert!(body.contains(r#""customMetadata":[{"key":"year","numericValue":2024.0}]"#));
    assert!(body.contains("hello file search"));
    assert!(body.contains("text/plain"));
}

#[tokio::test]
async fn operation_error_payload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/upload/v1beta/fileSearchStores/s1:uploadToFileSearchStore",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": OP_NAME,
            "done": true,
            "error": {"code": 3, "message": "Unsupported MIME type"}
        })))
        .mount(&server)
        .await;

    let file = temp_text_file("x");
    let err = client_for(&server)
        .upload_file(file.path(), "fileSearchStores/s1", None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FileSearchError::OperationFailed { code: Some(3), .. }
    ));
}

#[tokio::test]
async fn never_finishing_operation_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/upload/v1beta/fileSearchStores/s1:uploadToFileSearchStore",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1beta/{OP_NAME}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .mount(&server)
        .await;

    let client = FileSearchClient::builder(config_for(&server))
        .with_poll_options(
            PollOptions::new()
                .with_interval(Duration::from_millis(10))
                .with_max_attempts(Some(3)),
        )
        .build()
        .expect("client");

    let file = temp_text_file("x");
    let err = client
        .upload_file(file.path(), "fileSearchStores/s1", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FileSearchError::TimeoutError(_)));
}

#[tokio::test]
async fn cancelled_wait_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/upload/v1beta/fileSearchStores/s1:uploadToFileSearchStore",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let file = temp_text_file("x");
    let err = client_for(&server)
        .upload_file_with(
            file.path(),
            "fileSearchStores/s1",
            UploadConfig::new().with_mime_type("text/plain"),
            &token,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FileSearchError::Cancelled(_)));
}

#[tokio::test]
async fn import_file_posts_file_name_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/fileSearchStores/s1:importFile"))
        .and(wiremock::matchers::body_json(serde_json::json!({
            "fileName": "files/abc123",
            "chunkingConfig": {
                "whiteSpaceConfig": {"maxTokensPerChunk": 200, "maxOverlapTokens": 20}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_op()))
        .expect(1)
        .mount(&server)
        .await;

    let op = client_for(&server)
        .import_file(
            "fileSearchStores/s1",
            "files/abc123",
            UploadConfig::new().with_chunking_config(ChunkingConfig::white_space(200, 20)),
        )
        .await
        .expect("import");
    assert!(!op.is_done());
    assert_eq!(op.name, OP_NAME);
}
