//! Append-only conversation history.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use citysage_core::config::DEFAULT_GREETING;
use citysage_core::types::{Message, MessageId, Role, Timestamp};

use crate::error::ChatError;

/// Ordered message history for one conversation.
///
/// Starts with a single assistant greeting. Messages are only ever appended;
/// ids come from an internal counter so they stay strictly increasing.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    messages: Vec<Message>,
    next_id: MessageId,
}

impl ConversationStore {
    /// Create a fresh conversation seeded with `greeting`.
    ///
    /// A blank greeting is replaced by the default one.
    pub fn new(greeting: &str) -> Self {
        let greeting = if greeting.trim().is_empty() {
            DEFAULT_GREETING
        } else {
            greeting
        };
        let created_at = Timestamp::now();
        let greeting = Message {
            id: MessageId::FIRST,
            role: Role::Assistant,
            content: greeting.to_string(),
            created_at,
        };
        Self {
            session_id: Uuid::new_v4(),
            started_at: created_at.0,
            messages: vec![greeting],
            next_id: MessageId::FIRST.next(),
        }
    }

    /// Append a message and return a copy of it.
    pub fn append(&mut self, role: Role, content: &str) -> Result<Message, ChatError> {
        if content.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let message = Message {
            id: self.next_id,
            role,
            content: content.to_string(),
            created_at: Timestamp::now(),
        };
        self.next_id = self.next_id.next();
        self.messages.push(message.clone());
        Ok(message)
    }

    /// Copy of the current history in order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the greeting is present from creation.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

// =============================================================================
// Tests
// =============================================================================
