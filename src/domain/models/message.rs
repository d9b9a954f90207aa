#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::Local;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Normal,
    Error,
}

/// A single entry in the conversation log. The `id` is stamped by the
/// conversation store when the message is appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub sources: Option<Vec<String>>,
    pub timestamp: String,
    mtype: MessageType,
}

pub fn display_timestamp() -> String {
    return Local::now().format("%I:%M %p").to_string();
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        return Message {
            id: 0,
            role,
            text: text.to_string(),
            sources: None,
            timestamp: display_timestamp(),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(role: Role, mtype: MessageType, text: &str) -> Message {
        return Message {
            mtype,
            ..Message::new(role, text)
        };
    }

    pub fn new_with_sources(role: Role, text: &str, sources: Option<Vec<String>>) -> Message {
        return Message {
            sources,
            ..Message::new(role, text)
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    /// Absent and empty source lists are both "no sources".
    pub fn cited_sources(&self) -> &[String] {
        if let Some(sources) = &self.sources {
            return sources;
        }

        return &[];
    }
}
