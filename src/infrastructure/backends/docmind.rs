#[cfg(test)]
#[path = "docmind_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::file_display_name;
use crate::domain::models::Backend;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::CollectionStats;
use crate::domain::models::DocumentChunk;
use crate::domain::models::SystemStatus;

fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".pdf") {
        return "application/pdf";
    }

    return "application/octet-stream";
}

/// HTTP client for the DocMind API.
pub struct DocMind {
    url: String,
    timeout: String,
    health_check_timeout: String,
}

impl Default for DocMind {
    fn default() -> DocMind {
        return DocMind {
            url: Config::get(ConfigKey::ApiURL),
            timeout: Config::get(ConfigKey::RequestTimeout),
            health_check_timeout: Config::get(ConfigKey::BackendHealthCheckTimeout),
        };
    }
}

impl DocMind {
    fn endpoint(&self, path: &str) -> String {
        return format!("{url}{path}", url = self.url.trim_end_matches('/'));
    }

    fn client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .build()?;

        return Ok(client);
    }

    fn ensure_success(res: &reqwest::Response, operation: &str) -> Result<()> {
        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                url = %res.url(),
                "DocMind {operation} request failed"
            );
            bail!("DocMind {operation} request failed with status {}", res.status());
        }

        return Ok(());
    }
}

#[async_trait]
impl Backend for DocMind {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("DocMind API URL is not defined");
        }

        let res = reqwest::Client::new()
            .get(self.endpoint("/health"))
            .timeout(Duration::from_millis(
                self.health_check_timeout.parse::<u64>()?,
            ))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "DocMind is not reachable");
                bail!("DocMind is not reachable at {}", self.url);
            }
        };

        DocMind::ensure_success(&res, "health check")?;

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn upload_document(&self, file_path: &str) -> Result<()> {
        let file_name = file_display_name(file_path);
        let payload = fs::read(file_path).await?;
        let part = multipart::Part::bytes(payload)
            .file_name(file_name.to_string())
            .mime_str(mime_for(&file_name))?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client()?
            .post(self.endpoint("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        DocMind::ensure_success(&res, "upload")?;
        tracing::debug!(file_name = %file_name, "Uploaded document");

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn ask(&self, request: ChatRequest) -> Result<ChatResponse> {
        let res = self
            .client()?
            .post(self.endpoint("/api/chat"))
            .json(&request)
            .send()
            .await?;

        DocMind::ensure_success(&res, "chat")?;

        return Ok(res.json::<ChatResponse>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn system_status(&self) -> Result<SystemStatus> {
        let res = self
            .client()?
            .get(self.endpoint("/api/system/status"))
            .send()
            .await?;

        DocMind::ensure_success(&res, "system status")?;

        return Ok(res.json::<SystemStatus>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn collection_stats(&self) -> Result<CollectionStats> {
        let res = self
            .client()?
            .get(self.endpoint("/api/debug/stats"))
            .send()
            .await?;

        DocMind::ensure_success(&res, "stats")?;

        return Ok(res.json::<CollectionStats>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn debug_documents(&self) -> Result<Vec<DocumentChunk>> {
        let res = self
            .client()?
            .get(self.endpoint("/api/debug/documents"))
            .send()
            .await?;

        DocMind::ensure_success(&res, "documents")?;

        return Ok(res.json::<Vec<DocumentChunk>>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn reset(&self) -> Result<()> {
        let res = self
            .client()?
            .post(self.endpoint("/api/reset"))
            .send()
            .await?;

        DocMind::ensure_success(&res, "reset")?;

        return Ok(());
    }
}
