// src/chat.rs

use crate::models::JobRecord;
use chrono::{DateTime, Local};

pub const GREETING: &str = "Hi there! I can help you find job opportunities tailored to your skills and preferences. What kind of job are you looking for?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One chat turn. Created once, appended, never mutated.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// Non-empty only on assistant messages produced by a successful search.
    pub jobs: Vec<JobRecord>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Local::now(),
            jobs: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Local::now(),
            jobs: Vec::new(),
        }
    }

    pub fn assistant_with_jobs(content: impl Into<String>, jobs: Vec<JobRecord>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Local::now(),
            jobs,
        }
    }
}

/// Append-only, insertion-ordered log of the conversation. This is the
/// canonical timeline the UI paints; it is session-scoped and never
/// persisted.
#[derive(Debug)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    /// A new store already contains the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_seeds_greeting() {
        let store = MessageStore::new();
        assert_eq!(store.len(), 1);
        let first = store.last().unwrap();
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, GREETING);
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store = MessageStore::new();
        store.append(ChatMessage::user("first"));
        store.append(ChatMessage::assistant("second"));
        store.append(ChatMessage::user("third"));

        let contents: Vec<&str> = store
            .messages()
            .iter()
            .skip(1)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_user_message_carries_no_jobs() {
        let message = ChatMessage::user("Remote Data Science positions");
        assert!(message.jobs.is_empty());
    }
}
