use super::ChatRequest;

/// Work requested by the interface. Each action is executed by the actions
/// service against the backend and answered with a `BackendEvent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    BackendHealthCheck(),
    UploadDocument(String),
    AskQuestion(ChatRequest),
    RefreshSystemStatus(),
    RefreshCollectionStats(),
    InspectDocuments(),
    ResetKnowledgeBase(),
    CopyText(String),
}
