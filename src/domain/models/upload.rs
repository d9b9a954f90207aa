use std::path::Path;

/// Lifecycle of the single document upload an interface may run at a time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadState {
    pub status: UploadStatus,
    pub file_name: String,
}

pub fn file_display_name(file_path: &str) -> String {
    return Path::new(file_path)
        .file_name()
        .map(|name| return name.to_string_lossy().to_string())
        .unwrap_or_else(|| return file_path.to_string());
}
