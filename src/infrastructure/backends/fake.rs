use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::ChunkMetadata;
use crate::domain::models::CollectionStats;
use crate::domain::models::DocumentChunk;
use crate::domain::models::SystemStatus;

/// In-memory backend for service tests. Each operation can be made to fail,
/// and every call is recorded by name.
#[derive(Default)]
pub struct FakeBackend {
    pub fail_health: AtomicBool,
    pub fail_upload: AtomicBool,
    pub fail_ask: AtomicBool,
    pub fail_status: AtomicBool,
    pub fail_stats: AtomicBool,
    pub fail_documents: AtomicBool,
    pub fail_reset: AtomicBool,
    pub answer: Mutex<ChatResponse>,
    pub indexed: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_answer(answer: &str, sources: Option<Vec<&str>>) -> FakeBackend {
        let backend = FakeBackend::default();
        *backend.answer.lock().unwrap() = ChatResponse {
            answer: answer.to_string(),
            sources: sources.map(|e| return e.iter().map(|s| return s.to_string()).collect()),
        };

        return backend;
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        return self.calls.lock().unwrap().clone();
    }

    pub fn count(&self, name: &str) -> usize {
        return self.calls().iter().filter(|e| return *e == name).count();
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl Backend for FakeBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        self.record("health_check");
        if self.fail_health.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn upload_document(&self, _file_path: &str) -> Result<()> {
        self.record("upload_document");
        if self.fail_upload.load(Ordering::SeqCst) {
            bail!("Could not parse PDF");
        }
        self.indexed.fetch_add(12, Ordering::SeqCst);
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, _request: ChatRequest) -> Result<ChatResponse> {
        self.record("ask");
        if self.fail_ask.load(Ordering::SeqCst) {
            bail!("LLM timed out");
        }
        return Ok(self.answer.lock().unwrap().clone());
    }

    #[allow(clippy::implicit_return)]
    async fn system_status(&self) -> Result<SystemStatus> {
        self.record("system_status");
        if self.fail_status.load(Ordering::SeqCst) {
            bail!("status unavailable");
        }
        return Ok(SystemStatus {
            llm_model: Some("gpt-4o-mini".to_string()),
            ram_percent: Some(39.3),
            ..SystemStatus::default()
        });
    }

    #[allow(clippy::implicit_return)]
    async fn collection_stats(&self) -> Result<CollectionStats> {
        self.record("collection_stats");
        if self.fail_stats.load(Ordering::SeqCst) {
            bail!("stats unavailable");
        }
        return Ok(CollectionStats {
            count: self.indexed.load(Ordering::SeqCst) as u64,
            name: Some("docmind_docs".to_string()),
            status: None,
        });
    }

    #[allow(clippy::implicit_return)]
    async fn debug_documents(&self) -> Result<Vec<DocumentChunk>> {
        self.record("debug_documents");
        if self.fail_documents.load(Ordering::SeqCst) {
            bail!("documents unavailable");
        }
        return Ok(vec![DocumentChunk {
            id: "c0a1".to_string(),
            content: "Either party may terminate with thirty days notice.".to_string(),
            metadata: ChunkMetadata {
                source: "contract.pdf".to_string(),
                page: Some(3),
            },
        }]);
    }

    #[allow(clippy::implicit_return)]
    async fn reset(&self) -> Result<()> {
        self.record("reset");
        if self.fail_reset.load(Ordering::SeqCst) {
            bail!("reset failed");
        }
        self.indexed.store(0, Ordering::SeqCst);
        return Ok(());
    }
}
