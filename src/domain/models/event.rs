use tui_textarea::Input;

use super::ChatResponse;
use super::CollectionStats;
use super::DocumentChunk;
use super::SystemStatus;

/// Outcomes of backend work, applied to the interface state in the order
/// they are received.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendEvent {
    Unreachable(String),
    UploadSucceeded(String),
    UploadFailed(String),
    AnswerReceived(ChatResponse),
    AnswerFailed(),
    SystemStatusLoaded(SystemStatus),
    CollectionStatsLoaded(CollectionStats),
    DocumentsInspected(Option<CollectionStats>, Vec<DocumentChunk>),
    ResetSucceeded(),
    ResetFailed(),
    Notice(String),
}

pub enum Event {
    Backend(BackendEvent),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardEnter(),
    KeyboardEscape(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
