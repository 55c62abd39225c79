//! Error types for the conversational interface.

use citysage_core::error::CitySageError;

use crate::state::AssistantState;

/// Errors from the chat engine.
///
/// `EmptyMessage` and `Busy` are rejections: the submit was ignored and
/// nothing changed. Callers may retry once the assistant is idle again.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("assistant is busy with another message")]
    Busy,
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: AssistantState,
        to: AssistantState,
    },
    #[error("invalid knowledge entry: {0}")]
    InvalidKnowledgeEntry(String),
    #[error("no suggested prompt at index {0}")]
    UnknownSuggestion(usize),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("reply task failed: {0}")]
    Task(String),
}

impl ChatError {
    /// Whether this error means the submit was ignored and may be retried.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ChatError::EmptyMessage | ChatError::Busy)
    }
}

impl From<ChatError> for CitySageError {
    fn from(err: ChatError) -> Self {
        CitySageError::Chat(err.to_string())
    }
}
