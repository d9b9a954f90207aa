use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Snapshot from `/api/system/status`. Only the fields the inspector
/// renders are typed, everything else is kept in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub embedding_model: Option<String>,
    pub embedding_dimensions: Option<u64>,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    pub cpu_percent: Option<f64>,
    pub ram_percent: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub count: u64,
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub source: String,
    pub page: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Pages are stored zero-indexed by the backend.
    pub fn location(&self) -> String {
        let mut source = self.metadata.source.to_string();
        if source.is_empty() {
            source = "Unknown Document".to_string();
        }

        if let Some(page) = self.metadata.page {
            return format!("{source} (Page {})", page + 1);
        }

        return source;
    }
}
