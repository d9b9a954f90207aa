#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::Role;

/// Ordered, append-only log of everything rendered in the transcript.
/// Besides `append`, the only mutation is `reset`, which swaps the whole log
/// for a single assistant greeting.
#[derive(Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationStore {
    pub fn with_greeting(greeting: &str) -> ConversationStore {
        let mut store = ConversationStore::default();
        store.reset(greeting);
        return store;
    }

    pub fn append(&mut self, mut message: Message) -> &Message {
        self.next_id += 1;
        message.id = self.next_id;
        self.messages.push(message);

        return &self.messages[self.messages.len() - 1];
    }

    pub fn reset(&mut self, greeting: &str) {
        self.messages.clear();
        self.append(Message::new(Role::Assistant, greeting));
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn last(&self) -> Option<&Message> {
        return self.messages.last();
    }

    pub fn last_from(&self, role: Role) -> Option<&Message> {
        return self.messages.iter().rev().find(|m| return m.role == role);
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.messages.is_empty();
    }
}
