#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::CollectionStats;
use super::DocumentChunk;
use super::ModelName;
use super::SystemStatus;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub model: ModelName,
}

impl ChatRequest {
    pub fn new(question: &str, model: ModelName) -> ChatRequest {
        return ChatRequest {
            question: question.to_string(),
            model,
        };
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Option<Vec<String>>,
}

/// The document question-answering service. Every method resolves once the
/// backend has finished the operation or failed it, there is no streaming.
#[async_trait]
pub trait Backend {
    /// Used at startup to verify the backend is reachable.
    async fn health_check(&self) -> Result<()>;

    /// Sends the file at `file_path` for ingestion and indexing.
    async fn upload_document(&self, file_path: &str) -> Result<()>;

    /// Asks a question against the indexed documents using `request.model`
    /// for answer generation.
    async fn ask(&self, request: ChatRequest) -> Result<ChatResponse>;

    async fn system_status(&self) -> Result<SystemStatus>;

    async fn collection_stats(&self) -> Result<CollectionStats>;

    /// A sample of the stored chunks, used by the inspector.
    async fn debug_documents(&self) -> Result<Vec<DocumentChunk>>;

    /// Clears every indexed document.
    async fn reset(&self) -> Result<()>;
}

pub type BackendArc = Arc<dyn Backend + Send + Sync>;
