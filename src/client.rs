//! File Search client
//!
//! Thin facade over the File Search REST API (v1beta):
//! - Stores: `POST /fileSearchStores`, `GET /fileSearchStores`, `GET|DELETE /{store}`
//! - Upload: `POST /upload/v1beta/{store}:uploadToFileSearchStore` (multipart)
//! - Import: `POST /{store}:importFile { fileName }`
//! - Operations: `GET /{operation}`
//! - Documents: `GET /{store}/documents`, `GET|DELETE /{document}`
//! - Query: `POST /models/{model}:generateContent` with a `fileSearch` tool
//!
//! Each operation issues one remote call (uploads add a polling loop) and
//! reports a status line through `tracing` at `info`. Remote errors are
//! returned to the caller as-is.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::FileSearchConfig;
use crate::error::FileSearchError;
use crate::http::HttpExecutor;
use crate::poll::{PollOptions, poll_until_done};
use crate::retry::RetryPolicy;
use crate::types::{
    CustomMetadata, Document, DocumentsList, FileSearch, FileSearchStore, FileSearchStoresList,
    GenerateContentRequest, GenerateContentResponse, Operation, Tool, UploadConfig,
};
use crate::utils::http_interceptor::{HttpInterceptor, LoggingInterceptor};
use crate::utils::{guess_mime, join_url, join_url_segments, with_query};

/// Model used by [`FileSearchClient::query_store`] callers that have no preference.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Largest page the service accepts for store and document listings.
const MAX_PAGE_SIZE: u32 = 20;

/// Client for File Search stores, documents and grounded queries.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct FileSearchClient {
    config: FileSearchConfig,
    http: HttpExecutor,
    poll_options: PollOptions,
}

impl std::fmt::Debug for FileSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSearchClient")
            .field("base_url", &self.config.base_url)
            .field("poll_options", &self.poll_options)
            .finish_non_exhaustive()
    }
}

impl FileSearchClient {
    /// Acquire a client from `GEMINI_API_KEY` (and optional `GEMINI_BASE_URL`).
    ///
    /// Fails with [`FileSearchError::ConfigurationError`] before any network
    /// activity when the key is missing.
    pub fn from_env() -> Result<Self, FileSearchError> {
        Self::new(FileSearchConfig::from_env()?)
    }

    /// Build a client with default HTTP, retry and polling settings.
    pub fn new(config: FileSearchConfig) -> Result<Self, FileSearchError> {
        FileSearchClientBuilder::new(config).build()
    }

    pub fn builder(config: FileSearchConfig) -> FileSearchClientBuilder {
        FileSearchClientBuilder::new(config)
    }

    pub fn config(&self) -> &FileSearchConfig {
        &self.config
    }

    pub fn poll_options(&self) -> &PollOptions {
        &self.poll_options
    }

    // ---------------------------------------------------------------------
    // Stores
    // ---------------------------------------------------------------------

    /// Create a File Search Store
    pub async fn create_store(&self, display_name: &str) -> Result<FileSearchStore, FileSearchError> {
        let url = join_url(&self.config.base_url, "fileSearchStores");
        let body = serde_json::json!({ "displayName": display_name });
        let store: FileSearchStore = self.http.post_json("create_store", &url, &body).await?;
        tracing::info!(
            "Created File Search Store: {} (Display Name: {})",
            store.name,
            store.display_name_or_dash()
        );
        Ok(store)
    }

    /// Get a File Search Store by name
    pub async fn get_store(&self, store_name: &str) -> Result<FileSearchStore, FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, store_name]);
        self.http.get_json("get_store", &url).await
    }

    /// One page of stores.
    pub async fn list_stores_page(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<FileSearchStoresList, FileSearchError> {
        let url = join_url(&self.config.base_url, "fileSearchStores");
        let url = with_query(url, &page_params(page_size, page_token));
        self.http.get_json("list_stores", &url).await
    }

    /// List all stores, following pagination. Order is the service's.
    pub async fn list_stores(&self) -> Result<Vec<FileSearchStore>, FileSearchError> {
        let mut stores = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .list_stores_page(Some(MAX_PAGE_SIZE), page_token.as_deref())
                .await?;
            stores.extend(page.file_search_stores);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!("Found {} File Search Store(s).", stores.len());
        for store in &stores {
            tracing::info!(
                " - {} (Display Name: {})",
                store.name,
                store.display_name_or_dash()
            );
        }
        Ok(stores)
    }

    /// Delete a File Search Store.
    ///
    /// With `force`, documents inside the store are deleted too; without it
    /// the service rejects deleting a non-empty store.
    pub async fn delete_store(&self, store_name: &str, force: bool) -> Result<(), FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, store_name]);
        let url = with_query(url, &[("force", force.to_string())]);
        self.http.delete("delete_store", &url).await?;
        tracing::info!("Deleted File Search Store: {}", store_name);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Uploads and operations
    // ---------------------------------------------------------------------

    /// Upload a local file into a store and wait until it is indexed.
    ///
    /// Returns [`FileSearchError::FileNotFound`] before any request when
    /// `file_path` does not name an existing file.
    pub async fn upload_file(
        &self,
        file_path: impl AsRef<Path>,
        store_name: &str,
        display_name: Option<&str>,
        metadata: Option<Vec<CustomMetadata>>,
    ) -> Result<Operation, FileSearchError> {
        let mut config = UploadConfig::new();
        if let Some(name) = display_name.filter(|n| !n.is_empty()) {
            config = config.with_display_name(name);
        }
        if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
            config = config.with_custom_metadata(metadata);
        }
        self.upload_file_with(file_path, store_name, config, &CancellationToken::new())
            .await
    }

    /// [`upload_file`](Self::upload_file) with full upload options and a
    /// cancellation token for the wait.
    pub async fn upload_file_with(
        &self,
        file_path: impl AsRef<Path>,
        store_name: &str,
        config: UploadConfig,
        cancel: &CancellationToken,
    ) -> Result<Operation, FileSearchError> {
        let path = file_path.as_ref();
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(FileSearchError::FileNotFound(path.to_path_buf())),
        }
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        tracing::info!(
            "Uploading and importing {} to store {}...",
            path.display(),
            store_name
        );
        let operation = self
            .upload_bytes(store_name, content, &file_name, config)
            .await?;

        tracing::info!("Waiting for upload and indexing to complete...");
        let operation = self.wait_operation(operation, cancel).await?;
        tracing::info!("Upload and import complete.");
        Ok(operation)
    }

    /// Upload raw bytes into a store (multipart). Returns the pending operation.
    pub async fn upload_bytes(
        &self,
        store_name: &str,
        content: Vec<u8>,
        file_name: &str,
        config: UploadConfig,
    ) -> Result<Operation, FileSearchError> {
        let endpoint = format!(
            "{}:uploadToFileSearchStore",
            store_name.trim_end_matches('/')
        );
        let url = join_url_segments(&[&self.config.upload_base_url(), &endpoint]);
        let url = with_query(url, &[("uploadType", "multipart".to_string())]);

        let mime = config
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime(Some(&content), Some(file_name)));

        // Google multipart upload: JSON metadata part, then the file part
        let metadata_json = serde_json::to_string(&config)?;
        let metadata_part = reqwest::multipart::Part::text(metadata_json)
            .mime_str("application/json")
            .map_err(|e| {
                FileSearchError::InternalError(format!(
                    "Invalid hardcoded MIME type 'application/json': {e}"
                ))
            })?;
        let file_part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(&mime)
            .map_err(|e| FileSearchError::InvalidParameter(format!("Invalid MIME type '{mime}': {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        self.http
            .post_multipart("upload_to_file_search_store", &url, form)
            .await
    }

    /// Import a file previously uploaded through the Files API into a store.
    ///
    /// `file_name` is the Files API resource name (e.g. "files/abc123").
    /// Returns the pending operation.
    pub async fn import_file(
        &self,
        store_name: &str,
        file_name: &str,
        config: UploadConfig,
    ) -> Result<Operation, FileSearchError> {
        let endpoint = format!("{}:importFile", store_name.trim_end_matches('/'));
        let url = join_url_segments(&[&self.config.base_url, &endpoint]);

        let mut body = serde_json::json!({ "fileName": file_name });
        if let Some(metadata) = config.custom_metadata {
            body["customMetadata"] = serde_json::to_value(metadata)?;
        }
        if let Some(chunking) = config.chunking_config {
            body["chunkingConfig"] = serde_json::to_value(chunking)?;
        }
        let operation: Operation = self.http.post_json("import_file", &url, &body).await?;
        tracing::info!("Importing {} into store {}...", file_name, store_name);
        Ok(operation)
    }

    /// Get long-running operation status
    ///
    /// `operation_name` is the full resource path, e.g.
    /// "fileSearchStores/abc/upload/operations/xyz".
    pub async fn get_operation(&self, operation_name: &str) -> Result<Operation, FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, operation_name]);
        self.http.get_json("get_operation", &url).await
    }

    /// Poll an operation until it is done, using the client's [`PollOptions`].
    pub async fn wait_operation(
        &self,
        operation: Operation,
        cancel: &CancellationToken,
    ) -> Result<Operation, FileSearchError> {
        poll_until_done(
            operation,
            |name| async move { self.get_operation(&name).await },
            &self.poll_options,
            cancel,
        )
        .await
    }

    // ---------------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------------

    /// One page of documents in a store.
    pub async fn list_documents_page(
        &self,
        store_name: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<DocumentsList, FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, store_name, "documents"]);
        let url = with_query(url, &page_params(page_size, page_token));
        self.http.get_json("list_documents", &url).await
    }

    /// List all documents in a store, following pagination.
    pub async fn list_documents(&self, store_name: &str) -> Result<Vec<Document>, FileSearchError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .list_documents_page(store_name, Some(MAX_PAGE_SIZE), page_token.as_deref())
                .await?;
            documents.extend(page.documents);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            "Found {} document(s) in store {}.",
            documents.len(),
            store_name
        );
        for doc in &documents {
            tracing::info!(" - Document Name: {}", doc.name);
        }
        Ok(documents)
    }

    pub async fn get_document(&self, document_name: &str) -> Result<Document, FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, document_name]);
        self.http.get_json("get_document", &url).await
    }

    /// Delete a document from its store.
    pub async fn delete_document(&self, document_name: &str) -> Result<(), FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, document_name]);
        self.http.delete("delete_document", &url).await?;
        tracing::info!("Deleted document: {}", document_name);
        Ok(())
    }

    /// Delete a document, also removing its chunks when `force` is set.
    pub async fn delete_document_with_force(
        &self,
        document_name: &str,
        force: bool,
    ) -> Result<(), FileSearchError> {
        let url = join_url_segments(&[&self.config.base_url, document_name]);
        let url = with_query(url, &[("force", force.to_string())]);
        self.http.delete("delete_document", &url).await?;
        tracing::info!("Deleted document: {}", document_name);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Ask `model` a question grounded in one store.
    pub async fn query_store(
        &self,
        store_name: &str,
        query: &str,
        metadata_filter: Option<&str>,
        model: &str,
    ) -> Result<GenerateContentResponse, FileSearchError> {
        self.query_stores(&[store_name], query, metadata_filter, model)
            .await
    }

    /// Ask `model` a question grounded in several stores.
    pub async fn query_stores<S: AsRef<str>>(
        &self,
        store_names: &[S],
        query: &str,
        metadata_filter: Option<&str>,
        model: &str,
    ) -> Result<GenerateContentResponse, FileSearchError> {
        if store_names.is_empty() {
            return Err(FileSearchError::InvalidParameter(
                "at least one File Search Store is required".to_string(),
            ));
        }
        let names: Vec<&str> = store_names.iter().map(AsRef::as_ref).collect();

        let mut file_search = FileSearch::new(names.iter().copied());
        if let Some(filter) = metadata_filter.filter(|f| !f.is_empty()) {
            file_search = file_search.with_metadata_filter(filter);
        }

        tracing::info!(
            "Querying model '{}' with File Search Store '{}'...",
            model,
            names.join(", ")
        );
        let request = GenerateContentRequest::text_with_tools(query, vec![Tool::from(file_search)]);
        self.generate_content(model, &request).await
    }

    /// Send a raw generateContent request.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, FileSearchError> {
        let model = model.trim_start_matches("models/");
        if model.is_empty() {
            return Err(FileSearchError::InvalidParameter(
                "model must not be empty".to_string(),
            ));
        }
        let url = join_url(
            &self.config.base_url,
            &format!("models/{model}:generateContent"),
        );
        let body = serde_json::to_value(request)?;
        self.http.post_json("generate_content", &url, &body).await
    }
}

fn page_params(page_size: Option<u32>, page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(size) = page_size {
        params.push(("pageSize", size.to_string()));
    }
    if let Some(token) = page_token {
        params.push(("pageToken", token.to_string()));
    }
    params
}

/// Builder for [`FileSearchClient`]
///
/// # Example
/// ```rust,no_run
/// use gemini_file_search::{FileSearchClient, FileSearchConfig, PollOptions, RetryPolicy};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), gemini_file_search::FileSearchError> {
/// let client = FileSearchClient::builder(FileSearchConfig::from_env()?)
///     .with_retry(RetryPolicy::new().with_max_attempts(3))
///     .with_poll_options(PollOptions::new().with_timeout(Some(Duration::from_secs(600))))
///     .with_http_logging()
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FileSearchClientBuilder {
    config: FileSearchConfig,
    http_client: Option<reqwest::Client>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    retry_policy: Option<RetryPolicy>,
    poll_options: PollOptions,
}

impl FileSearchClientBuilder {
    pub fn new(config: FileSearchConfig) -> Self {
        Self {
            config,
            http_client: None,
            interceptors: Vec::new(),
            retry_policy: None,
            poll_options: PollOptions::default(),
        }
    }

    /// Reuse an existing HTTP client instead of building one from the config.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Log every request/response at `debug` level.
    pub fn with_http_logging(self) -> Self {
        self.with_interceptor(Arc::new(LoggingInterceptor))
    }

    /// Retry failed requests that are retryable. Multipart uploads are never
    /// retried.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poll_options = options;
        self
    }

    pub fn build(self) -> Result<FileSearchClient, FileSearchError> {
        if !self.config.base_url.starts_with("http://")
            && !self.config.base_url.starts_with("https://")
        {
            return Err(FileSearchError::ConfigurationError(format!(
                "Invalid base URL '{}'",
                self.config.base_url
            )));
        }
        let headers = self.config.build_headers()?;
        let http_client = match self.http_client {
            Some(client) => client,
            None => self.config.build_http_client()?,
        };
        let http = HttpExecutor::new(http_client, headers, self.interceptors, self.retry_policy);
        Ok(FileSearchClient {
            config: self.config,
            http,
            poll_options: self.poll_options,
        })
    }
}
