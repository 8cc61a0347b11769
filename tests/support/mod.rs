//! Shared helpers for mock-server tests

#![allow(dead_code)]

use std::time::Duration;

use gemini_file_search::{FileSearchClient, FileSearchConfig, PollOptions};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";

/// Client pointed at `<mock>/v1beta`, polling every 10ms with a 5s budget.
pub fn client_for(server: &MockServer) -> FileSearchClient {
    FileSearchClient::builder(config_for(server))
        .with_poll_options(fast_poll())
        .build()
        .expect("client")
}

pub fn config_for(server: &MockServer) -> FileSearchConfig {
    FileSearchConfig::new(API_KEY).with_base_url(format!("{}/v1beta", server.uri()))
}

pub fn fast_poll() -> PollOptions {
    PollOptions::new()
        .with_interval(Duration::from_millis(10))
        .with_timeout(Some(Duration::from_secs(5)))
}

pub fn store_json(name: &str, display_name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "displayName": display_name,
        "createTime": "2025-11-06T10:00:00Z",
        "activeDocumentsCount": "1"
    })
}

pub fn google_error(code: u16, status: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {"code": code, "message": message, "status": status}
    })
}
