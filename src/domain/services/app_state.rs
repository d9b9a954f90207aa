#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use strum::VariantNames;

use super::actions::help_text;
use super::BubbleList;
use super::ConversationStore;
use super::Scroll;
use crate::domain::models::file_display_name;
use crate::domain::models::Action;
use crate::domain::models::BackendEvent;
use crate::domain::models::ChatRequest;
use crate::domain::models::CollectionStats;
use crate::domain::models::DocumentChunk;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::ModelName;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::SystemStatus;
use crate::domain::models::UploadState;
use crate::domain::models::UploadStatus;

pub const WELCOME_GREETING: &str = "Hello! I'm DocMind AI. Upload a PDF contract or manual, and I'll help you navigate it instantly.";
pub const ANSWER_FAILED: &str = "Sorry, I encountered an error. Please try again.";
pub const RESET_GREETING: &str = "Knowledge base cleared. Ready for new documents.";
pub const RESET_FAILED: &str = "Failed to reset knowledge base";

pub fn model_greeting(model: ModelName) -> String {
    return format!(
        "Switched to {}. Ready to answer your questions!",
        model.display_name()
    );
}

/// Everything the interface renders. All backend interaction goes through
/// two halves: a `submit_*` call that guards and records the optimistic
/// update and hands back the `Action` to run, and `handle_backend_event`
/// which applies the outcome.
pub struct AppState {
    pub conversation: ConversationStore,
    pub upload: UploadState,
    /// File name of the upload still running against the backend. Only the
    /// upload controller and its outcome events touch it.
    pub upload_in_flight: Option<String>,
    pub waiting_for_backend: bool,
    pub awaiting_reset_confirmation: bool,
    pub model: ModelName,
    pub system_status: Option<SystemStatus>,
    pub collection_stats: Option<CollectionStats>,
    pub inspected_documents: Option<Vec<DocumentChunk>>,
    pub alert: Option<String>,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
    pub last_known_height: u16,
    pub last_known_width: u16,
}

impl Default for AppState {
    fn default() -> AppState {
        return AppState::new(ModelName::default());
    }
}

impl AppState {
    pub fn new(model: ModelName) -> AppState {
        return AppState {
            conversation: ConversationStore::with_greeting(WELCOME_GREETING),
            upload: UploadState::default(),
            upload_in_flight: None,
            waiting_for_backend: false,
            awaiting_reset_confirmation: false,
            model,
            system_status: None,
            collection_stats: None,
            inspected_documents: None,
            alert: None,
            bubble_list: BubbleList::default(),
            scroll: Scroll::default(),
            last_known_width: 0,
            last_known_height: 0,
        };
    }

    /// Starts uploading `file_path`. Returns `None` when another upload is
    /// still in flight.
    pub fn submit_upload(&mut self, file_path: &str) -> Option<Action> {
        let file_path = file_path.trim();
        if file_path.is_empty() || self.upload_in_flight.is_some() {
            return None;
        }

        let file_name = file_display_name(file_path);
        self.upload_in_flight = Some(file_name.to_string());
        self.upload = UploadState {
            status: UploadStatus::Uploading,
            file_name,
        };

        return Some(Action::UploadDocument(file_path.to_string()));
    }

    /// Records the question in the transcript and returns the request to
    /// send. Blank questions, and questions asked while an answer is still
    /// pending, are ignored.
    pub fn submit_question(&mut self, text: &str) -> Option<Action> {
        if text.trim().is_empty() || self.waiting_for_backend {
            return None;
        }

        self.waiting_for_backend = true;
        self.add_message(Message::new(Role::User, text));

        return Some(Action::AskQuestion(ChatRequest::new(text, self.model)));
    }

    /// Always resets the conversation, even when `model` is already active.
    pub fn select_model(&mut self, model: ModelName) {
        self.model = model;
        self.conversation.reset(&model_greeting(model));
        self.sync_dependants();
        self.scroll.last();
    }

    /// `confirm` is asked before anything happens. Declining leaves the
    /// state untouched and no request is made.
    pub fn reset_knowledge_base<F: FnOnce() -> bool>(&self, confirm: F) -> Option<Action> {
        if !confirm() {
            return None;
        }

        return Some(Action::ResetKnowledgeBase());
    }

    pub fn copy_last_answer(&self) -> Option<Action> {
        return self
            .conversation
            .last_from(Role::Assistant)
            .map(|message| return Action::CopyText(message.text.to_string()));
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) -> Option<Action> {
        match event {
            BackendEvent::Unreachable(err) => {
                self.add_message(Message::new_with_type(
                    Role::Assistant,
                    MessageType::Error,
                    &format!("Hey, it looks like the DocMind backend isn't reachable. Uploads and questions will fail until it's running.\n\nError: {err}"),
                ));
            }
            BackendEvent::UploadSucceeded(file_name) => {
                self.add_message(Message::new(
                    Role::Assistant,
                    &format!("Successfully processed {file_name}. I'm ready to answer your questions!"),
                ));
                self.upload_in_flight = None;
                self.upload = UploadState {
                    status: UploadStatus::Success,
                    file_name,
                };

                return Some(Action::RefreshCollectionStats());
            }
            BackendEvent::UploadFailed(file_name) => {
                self.add_message(Message::new_with_type(
                    Role::Assistant,
                    MessageType::Error,
                    &format!("Failed to upload {file_name}. Please try again."),
                ));
                self.upload_in_flight = None;
                self.upload = UploadState {
                    status: UploadStatus::Error,
                    file_name,
                };
            }
            BackendEvent::AnswerReceived(res) => {
                if res.answer.trim().is_empty() {
                    self.add_message(Message::new_with_type(
                        Role::Assistant,
                        MessageType::Error,
                        ANSWER_FAILED,
                    ));
                } else {
                    self.add_message(Message::new_with_sources(
                        Role::Assistant,
                        &res.answer,
                        res.sources,
                    ));
                }
                self.waiting_for_backend = false;
            }
            BackendEvent::AnswerFailed() => {
                self.add_message(Message::new_with_type(
                    Role::Assistant,
                    MessageType::Error,
                    ANSWER_FAILED,
                ));
                self.waiting_for_backend = false;
            }
            BackendEvent::SystemStatusLoaded(status) => {
                self.system_status = Some(status);
            }
            BackendEvent::CollectionStatsLoaded(stats) => {
                self.collection_stats = Some(stats);
            }
            BackendEvent::DocumentsInspected(stats, chunks) => {
                if stats.is_some() {
                    self.collection_stats = stats;
                }
                self.inspected_documents = Some(chunks);
            }
            BackendEvent::ResetSucceeded() => {
                // An upload still in flight keeps its guard until it settles.
                self.conversation.reset(RESET_GREETING);
                self.upload = UploadState::default();
                self.inspected_documents = None;
                self.sync_dependants();
                self.scroll.last();

                return Some(Action::RefreshCollectionStats());
            }
            BackendEvent::ResetFailed() => {
                self.alert = Some(RESET_FAILED.to_string());
            }
            BackendEvent::Notice(text) => {
                self.alert = Some(text);
            }
        }

        return None;
    }

    /// Handles chat commands typed into the prompt. Returns
    /// `(should_break, action)`: whether the interface should exit, and any
    /// backend work the command started.
    pub fn handle_slash_commands(&mut self, input_str: &str) -> (bool, Option<Action>) {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return (false, None),
        };

        if command.is_quit() {
            return (true, None);
        }

        if command.is_help() {
            self.add_message(Message::new(Role::Assistant, &help_text()));
            self.scroll.last();
            return (false, None);
        }

        if command.is_upload() {
            let file_path = command.arg_text();
            if file_path.is_empty() {
                self.add_error("You must specify a file path with `/upload` or `/u`. Run `/help` for more details.");
                return (false, None);
            }
            if let Some(in_flight) = &self.upload_in_flight {
                self.alert = Some(format!(
                    "Still uploading {in_flight}, wait for it to finish."
                ));
                return (false, None);
            }

            return (false, self.submit_upload(&file_path));
        }

        if command.is_model_set() {
            let name = command.arg_text();
            if let Some(model) = ModelName::parse(&name) {
                self.select_model(model);
            } else {
                self.add_error(&format!(
                    "No model named {name}. Possible values are: {}",
                    ModelName::VARIANTS.join(", ")
                ));
            }
            return (false, None);
        }

        if command.is_reset() {
            self.awaiting_reset_confirmation = true;
            return (false, None);
        }

        if command.is_inspect() {
            return (false, Some(Action::InspectDocuments()));
        }

        if command.is_copy() {
            return (false, self.copy_last_answer());
        }

        return (false, None);
    }

    /// Answers the pending `/reset` prompt.
    pub fn confirm_reset(&mut self, answer: &str) -> Option<Action> {
        self.awaiting_reset_confirmation = false;
        let answer = answer.trim().to_lowercase();

        return self.reset_knowledge_base(|| return answer == "y" || answer == "yes");
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Appends to the transcript. The view follows the new message only when
    /// it was already showing the bottom, or an answer is pending.
    pub fn add_message(&mut self, message: Message) {
        self.conversation.append(message);
        self.sync_dependants();
    }

    fn add_error(&mut self, text: &str) {
        self.add_message(Message::new_with_type(
            Role::Assistant,
            MessageType::Error,
            text,
        ));
        self.scroll.last();
    }

    fn sync_dependants(&mut self) {
        let following = self.scroll.is_at_last();
        self.bubble_list.set_messages(
            self.conversation.messages(),
            self.last_known_width.into(),
        );

        self.scroll.set_state(
            self.bubble_list.len().try_into().unwrap_or(u16::MAX),
            self.last_known_height,
        );

        if following || self.waiting_for_backend {
            self.scroll.last();
        }
    }
}
