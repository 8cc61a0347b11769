//! # gemini-file-search
//!
//! An async client for the Gemini File Search API: create and manage File
//! Search stores, upload local files into them (waiting for indexing), list
//! and delete documents, and ask a model questions grounded in those stores.
//!
//! ```rust,no_run
//! use gemini_file_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), FileSearchError> {
//!     let client = FileSearchClient::from_env()?;
//!     let store = client.create_store("Technical Documentation").await?;
//!     client
//!         .upload_file("README.md", &store.name, Some("Readme"), None)
//!         .await?;
//!     let response = client
//!         .query_store(&store.name, "How do I get started?", None, DEFAULT_MODEL)
//!         .await?;
//!     println!("{}", response.text());
//!     client.delete_store(&store.name, true).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod http;
pub mod poll;
pub mod retry;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use client::{DEFAULT_MODEL, FileSearchClient, FileSearchClientBuilder};
pub use config::FileSearchConfig;
pub use error::FileSearchError;
pub use poll::{PollOptions, poll_until_done};
pub use retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;

/// Commonly used items
pub mod prelude {
    pub use crate::client::{DEFAULT_MODEL, FileSearchClient, FileSearchClientBuilder};
    pub use crate::config::FileSearchConfig;
    pub use crate::error::FileSearchError;
    pub use crate::poll::PollOptions;
    pub use crate::retry::RetryPolicy;
    pub use crate::types::*;
    pub use tokio_util::sync::CancellationToken;
}
