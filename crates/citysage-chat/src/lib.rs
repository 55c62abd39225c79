//! Conversational interface for CitySage.
//!
//! Matches free-text questions against an ordered keyword knowledge base,
//! falls back to a templated reply on a miss, and serializes the
//! question/answer cycle through a two-state scheduler with simulated
//! generation latency.

pub mod conversation;
pub mod error;
pub mod fallback;
pub mod knowledge;
pub mod matcher;
pub mod prompts;
pub mod response;
pub mod scheduler;
pub mod state;

pub use conversation::ConversationStore;
pub use error::ChatError;
pub use fallback::FallbackSynthesizer;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use matcher::Matcher;
pub use prompts::{Composer, Key, KeyAction, SuggestedPrompts};
pub use response::{Reply, ReplySource, ResponseGenerator};
pub use scheduler::{PendingReply, ResponseScheduler, SchedulerConfig};
pub use state::{AssistantState, StateMachine};
