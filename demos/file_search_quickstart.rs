//! File Search Quickstart
//!
//! Creates a store, uploads a document with custom metadata, lists what was
//! indexed, asks two grounded questions (with and without a metadata filter)
//! and finally deletes the store.
//!
//! ```bash
//! export GEMINI_API_KEY="your-key"
//! cargo run --example file_search_quickstart -- path/to/doc.md
//! ```
//!
//! Without a path argument a small sample document is written to the temp dir.

use std::path::{Path, PathBuf};

use gemini_file_search::prelude::*;
use gemini_file_search::telemetry::{TracingConfig, init_tracing};

const SAMPLE: &str = "\
# Authentication

All requests need an API key sent in the `x-goog-api-key` header.
Keys can be rotated from the console; old keys stop working after 24 hours.
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(TracingConfig::minimal())?;

    let client = FileSearchClient::from_env()?;

    let path = match std::env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => {
            let p = std::env::temp_dir().join("file_search_quickstart.md");
            tokio::fs::write(&p, SAMPLE).await?;
            p
        }
    };

    let store = client.create_store("Quickstart Docs").await?;

    let result = run(&client, &store.name, &path).await;

    // Always clean up, even when a step above failed
    client.delete_store(&store.name, true).await?;
    result
}

async fn run(
    client: &FileSearchClient,
    store: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let op = client
        .upload_file(
            path,
            store,
            Some("Authentication Guide"),
            Some(vec![
                CustomMetadata::string("category", "api-docs"),
                CustomMetadata::numeric("version", 2.0),
            ]),
        )
        .await?;
    if let Some(doc) = op.document_name() {
        println!("Indexed document: {doc}");
    }

    client.list_stores().await?;
    client.list_documents(store).await?;

    let answer = client
        .query_store(store, "How do I authenticate?", None, DEFAULT_MODEL)
        .await?;
    println!("\n{}\n", answer.text());

    let filtered = client
        .query_store(
            store,
            "How long do old keys keep working?",
            Some("category = \"api-docs\""),
            DEFAULT_MODEL,
        )
        .await?;
    println!("\n{}\n", filtered.text());

    Ok(())
}
