use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File Search Store resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchStore {
    /// Resource name, e.g., "fileSearchStores/abc123"
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Documents ready for retrieval
    #[serde(default, with = "super::int64", skip_serializing_if = "Option::is_none")]
    pub active_documents_count: Option<i64>,
    /// Documents still being processed
    #[serde(default, with = "super::int64", skip_serializing_if = "Option::is_none")]
    pub pending_documents_count: Option<i64>,
    #[serde(default, with = "super::int64", skip_serializing_if = "Option::is_none")]
    pub failed_documents_count: Option<i64>,
    /// Total size of ingested bytes
    #[serde(default, with = "super::int64", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
}

impl FileSearchStore {
    /// Display name, or "-" when the store has none.
    pub fn display_name_or_dash(&self) -> &str {
        self.display_name.as_deref().unwrap_or("-")
    }
}

/// List response for File Search Stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchStoresList {
    #[serde(default)]
    pub file_search_stores: Vec<FileSearchStore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Long-running operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation resource name, e.g., "fileSearchStores/abc/operations/xyz"
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    /// Service-defined progress metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Successful response (schema varies by operation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }

    /// Name of the created document, when the response carries one.
    pub fn document_name(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.get("documentName"))
            .and_then(|v| v.as_str())
    }
}

/// Operation error payload (google.rpc.Status)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

/// One key/value pair attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMetadata {
    pub key: String,
    #[serde(flatten)]
    pub value: CustomMetadataValue,
}

impl CustomMetadata {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: CustomMetadataValue::StringValue(value.into()),
        }
    }

    pub fn numeric(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: CustomMetadataValue::NumericValue(value),
        }
    }

    pub fn string_list<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            value: CustomMetadataValue::StringListValue(StringList {
                values: values.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

/// Exactly one of the supported value kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomMetadataValue {
    StringValue(String),
    StringListValue(StringList),
    NumericValue(f64),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StringList {
    #[serde(default)]
    pub values: Vec<String>,
}

/// White-space based chunking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteSpaceChunkingConfig {
    pub max_tokens_per_chunk: u32,
    pub max_overlap_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_space_config: Option<WhiteSpaceChunkingConfig>,
}

impl ChunkingConfig {
    pub fn white_space(max_tokens_per_chunk: u32, max_overlap_tokens: u32) -> Self {
        Self {
            white_space_config: Some(WhiteSpaceChunkingConfig {
                max_tokens_per_chunk,
                max_overlap_tokens,
            }),
        }
    }
}

/// Options for uploading or importing a file into a store.
///
/// Serializes as the JSON metadata part of the upload request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Vec<CustomMetadata>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunking_config: Option<ChunkingConfig>,
    /// Overrides MIME detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl UploadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_custom_metadata(mut self, metadata: Vec<CustomMetadata>) -> Self {
        self.custom_metadata = Some(metadata);
        self
    }

    pub fn with_chunking_config(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking_config = Some(chunking);
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
