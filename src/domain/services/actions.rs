#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use super::AppState;
use crate::domain::models::file_display_name;
use crate::domain::models::Action;
use crate::domain::models::BackendArc;
use crate::domain::models::BackendEvent;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /upload (/u) [FILE_PATH] - Uploads a document to the knowledge base. Only one upload can run at a time.
- /model (/m) [MODEL_NAME] - Switches the model answering questions (openai, ollama). Switching always starts a fresh conversation.
- /reset - Clears every document from the knowledge base. You will be asked to confirm.
- /inspect (/i) - Loads a sample of the indexed document chunks into the inspector.
- /copy (/c) - Copies the last answer to your clipboard.
- /quit /exit (/q) - Exit DocMind.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs a single action against the backend. Every failure is collapsed
    /// into the matching failure event, or only logged for background
    /// refreshes.
    pub async fn execute(backend: &BackendArc, action: Action) -> Option<BackendEvent> {
        match action {
            Action::BackendHealthCheck() => {
                if let Err(err) = backend.health_check().await {
                    tracing::warn!(error = ?err, "Backend health check failed");
                    return Some(BackendEvent::Unreachable(err.to_string()));
                }
            }
            Action::UploadDocument(file_path) => {
                let file_name = file_display_name(&file_path);
                if let Err(err) = backend.upload_document(&file_path).await {
                    tracing::error!(error = ?err, file_name = %file_name, "Failed to upload document");
                    return Some(BackendEvent::UploadFailed(file_name));
                }

                return Some(BackendEvent::UploadSucceeded(file_name));
            }
            Action::AskQuestion(req) => match backend.ask(req).await {
                Ok(res) => return Some(BackendEvent::AnswerReceived(res)),
                Err(err) => {
                    tracing::error!(error = ?err, "Failed to get an answer");
                    return Some(BackendEvent::AnswerFailed());
                }
            },
            Action::RefreshSystemStatus() => match backend.system_status().await {
                Ok(status) => return Some(BackendEvent::SystemStatusLoaded(status)),
                Err(err) => {
                    tracing::warn!(error = ?err, "Failed to refresh system status");
                }
            },
            Action::RefreshCollectionStats() => match backend.collection_stats().await {
                Ok(stats) => return Some(BackendEvent::CollectionStatsLoaded(stats)),
                Err(err) => {
                    tracing::warn!(error = ?err, "Failed to refresh collection stats");
                }
            },
            Action::InspectDocuments() => {
                let (stats_res, chunks_res) =
                    futures::join!(backend.collection_stats(), backend.debug_documents());

                match chunks_res {
                    Ok(chunks) => {
                        return Some(BackendEvent::DocumentsInspected(stats_res.ok(), chunks));
                    }
                    Err(err) => {
                        tracing::warn!(error = ?err, "Failed to fetch debug documents");
                        return Some(BackendEvent::Notice(
                            "Failed to fetch debug data".to_string(),
                        ));
                    }
                }
            }
            Action::ResetKnowledgeBase() => {
                if let Err(err) = backend.reset().await {
                    tracing::error!(error = ?err, "Failed to reset knowledge base");
                    return Some(BackendEvent::ResetFailed());
                }

                return Some(BackendEvent::ResetSucceeded());
            }
            Action::CopyText(text) => {
                if let Err(err) = ClipboardService::set(text) {
                    tracing::warn!(error = ?err, "Failed to copy to clipboard");
                    return Some(BackendEvent::Notice(format!(
                        "Clipboard is unavailable: {err}"
                    )));
                }

                return Some(BackendEvent::Notice(
                    "Copied the last answer to your clipboard.".to_string(),
                ));
            }
        }

        return None;
    }

    /// Runs `action` and everything it triggers to completion, applying each
    /// outcome to `app_state`. Used where there is no event loop, such as the
    /// one-shot CLI commands.
    pub async fn drive(app_state: &mut AppState, backend: &BackendArc, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(event) = ActionsService::execute(backend, action).await {
                next = app_state.handle_backend_event(event);
            }
        }
    }

    /// Worker loop for the interface. Each action runs on its own task so a
    /// slow upload never blocks a question, and results are sent back as
    /// events. Returns once the interface drops its sender.
    pub async fn start(
        backend: BackendArc,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let worker_backend = backend.clone();
            let worker_tx = tx.clone();

            tokio::spawn(async move {
                if let Some(event) = ActionsService::execute(&worker_backend, action).await {
                    if worker_tx.send(Event::Backend(event)).is_err() {
                        tracing::debug!("Interface closed before the backend responded");
                    }
                }
            });
        }

        return Ok(());
    }
}
