//! Wire types for the File Search API.
//!
//! All resources are owned by the remote service; these structs only mirror
//! the JSON they travel as. Unknown fields are ignored.

pub mod documents;
pub mod file_search;
pub mod generation;

pub use documents::{Document, DocumentState, DocumentsList};
pub use file_search::{
    ChunkingConfig, CustomMetadata, CustomMetadataValue, FileSearchStore, FileSearchStoresList,
    Operation, OperationError, StringList, UploadConfig, WhiteSpaceChunkingConfig,
};
pub use generation::{
    Candidate, Content, FileSearch, GenerateContentRequest, GenerateContentResponse, Part, Tool,
    UsageMetadata,
};

/// The service encodes int64 fields as JSON strings; accept both forms.
pub(crate) mod int64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }

    pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Num(n)) => Ok(Some(n)),
            Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
