//! Conversation state: the ordered message log of one chat session.
//!
//! The log is append-only and seeded with a greeting. `is_loading` marks a
//! turn in flight; [`Conversation::begin_turn`] refuses to start another
//! until [`Conversation::finish_turn`] clears it.

use serde::Serialize;
use uuid::Uuid;

use super::chat::ChatError;
use crate::llm::types::{Message, Role};

pub const GREETING: &str = "Hello! I'm your StoreAI assistant. How can I help you manage your grocery store today?";

/// One transcript entry. Ordering is by position in the log, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    is_loading: bool,
    pending_input: String,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A fresh conversation holding only the greeting.
    #[must_use]
    pub fn new() -> Self {
        let mut conversation = Self { messages: Vec::new(), is_loading: false, pending_input: String::new() };
        conversation.append(Role::Assistant, GREETING);
        conversation
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Append a message stamped no earlier than the previous one.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> ChatMessage {
        let floor = self.messages.last().map_or(i64::MIN, |m| m.timestamp);
        let message = ChatMessage { id: Uuid::new_v4(), role, content: content.into(), timestamp: now_millis().max(floor) };
        self.messages.push(message.clone());
        message
    }

    /// Start a turn: append the trimmed user message, clear the draft, and
    /// mark the conversation as loading.
    ///
    /// # Errors
    ///
    /// [`ChatError::EmptyMessage`] for blank input and
    /// [`ChatError::TurnInFlight`] while another turn is unresolved. Either
    /// way the conversation is left untouched.
    pub fn begin_turn(&mut self, input: &str) -> Result<ChatMessage, ChatError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.is_loading {
            return Err(ChatError::TurnInFlight);
        }
        let message = self.append(Role::User, text);
        self.pending_input.clear();
        self.is_loading = true;
        Ok(message)
    }

    /// Close the turn with the assistant's reply.
    pub fn finish_turn(&mut self, reply: impl Into<String>) -> ChatMessage {
        let message = self.append(Role::Assistant, reply);
        self.set_loading(false);
        message
    }

    /// Prompt history in `{role, content}` form, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Message> {
        self.messages
            .iter()
            .map(|m| Message::new(m.role, m.content.clone()))
            .collect()
    }
}

fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
