//! Response scheduler: one question-to-reply cycle at a time.
//!
//! A submitted question is echoed into the conversation immediately, the
//! reply is generated, and after the configured delay the assistant message
//! is appended. While a reply is pending every other submit is rejected with
//! [`ChatError::Busy`], so replies always land in the order their questions
//! were accepted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use citysage_core::config::{AssistantConfig, DEFAULT_GREETING, DEFAULT_RESPONSE_DELAY_MS};
use citysage_core::types::{Message, Role};

use crate::conversation::ConversationStore;
use crate::error::ChatError;
use crate::knowledge::KnowledgeBase;
use crate::response::{ReplySource, ResponseGenerator};
use crate::state::{AssistantState, StateMachine};

/// Scheduler settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Simulated generation latency.
    pub response_delay: Duration,
    /// Seed message of each new conversation.
    pub greeting: String,
    /// Buffer size of the message broadcast channel. Clamped to at least 1.
    pub event_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            response_delay: Duration::from_millis(DEFAULT_RESPONSE_DELAY_MS),
            greeting: DEFAULT_GREETING.to_string(),
            event_capacity: 64,
        }
    }
}

impl From<&AssistantConfig> for SchedulerConfig {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            response_delay: Duration::from_millis(config.response_delay_ms),
            greeting: config.greeting.clone(),
            event_capacity: config.event_capacity,
        }
    }
}

/// State machine and history, guarded together.
struct Session {
    state: StateMachine,
    conversation: ConversationStore,
}

struct Shared {
    session: Mutex<Session>,
    generator: ResponseGenerator,
    config: SchedulerConfig,
    state_tx: watch::Sender<AssistantState>,
    message_tx: broadcast::Sender<Message>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, Session>, ChatError> {
        self.session.lock().map_err(|e| {
            tracing::error!("Session lock poisoned: {}", e);
            ChatError::Internal(format!("session lock poisoned: {}", e))
        })
    }

    /// Read-only access survives poisoning; the history is append-only.
    fn read(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, message: &Message) {
        // No subscribers is fine.
        let _ = self.message_tx.send(message.clone());
    }

    /// Return a session stuck in Processing to Idle and notify watchers.
    fn release(&self, session: &mut Session) {
        if session.state.transition(AssistantState::Idle).is_ok() {
            self.state_tx.send_replace(AssistantState::Idle);
        }
    }

    async fn complete(self: Arc<Self>, query: String, session_id: Uuid) -> Result<Message, ChatError> {
        let reply = self.generator.generate(&query);
        match &reply.source {
            ReplySource::Knowledge { keyword } => {
                tracing::debug!(%session_id, keyword = %keyword, "Knowledge entry matched")
            }
            ReplySource::Fallback => tracing::debug!(%session_id, "No keyword matched, using fallback"),
        }

        tokio::time::sleep(self.config.response_delay).await;

        // Notifications go out under the lock so observers see store order.
        let message = {
            let mut session = match self.lock() {
                Ok(session) => session,
                Err(e) => {
                    self.release(&mut self.read());
                    return Err(e);
                }
            };
            let message = match session.conversation.append(Role::Assistant, &reply.text) {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(%session_id, error = %e, "Failed to append reply");
                    self.release(&mut session);
                    return Err(e);
                }
            };
            session.state.transition(AssistantState::Idle)?;
            self.state_tx.send_replace(AssistantState::Idle);
            self.publish(&message);
            message
        };

        tracing::info!(
            %session_id,
            message_id = %message.id,
            fallback = reply.is_fallback(),
            "Assistant reply appended"
        );
        Ok(message)
    }
}

/// Handle to an accepted question whose reply is still pending.
///
/// Dropping it does not cancel the reply.
#[derive(Debug)]
pub struct PendingReply {
    user_message: Message,
    handle: JoinHandle<Result<Message, ChatError>>,
}

impl PendingReply {
    /// The user message appended when the question was accepted.
    pub fn user_message(&self) -> &Message {
        &self.user_message
    }

    /// Wait for the assistant message.
    pub async fn wait(self) -> Result<Message, ChatError> {
        self.handle
            .await
            .map_err(|e| ChatError::Task(e.to_string()))?
    }
}

/// Serializes question/reply cycles over a single conversation.
///
/// Cheap to clone; clones share the same conversation and state.
#[derive(Clone)]
pub struct ResponseScheduler {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ResponseScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseScheduler")
            .field("state", &self.state())
            .field("messages", &self.len())
            .field("config", &self.shared.config)
            .finish()
    }
}

impl ResponseScheduler {
    pub fn new(knowledge: Arc<KnowledgeBase>, config: SchedulerConfig) -> Self {
        let (state_tx, _) = watch::channel(AssistantState::Idle);
        let (message_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let session = Session {
            state: StateMachine::new(),
            conversation: ConversationStore::new(&config.greeting),
        };
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                generator: ResponseGenerator::new(knowledge),
                config,
                state_tx,
                message_tx,
            }),
        }
    }

    /// Submit a question.
    ///
    /// Blank input is rejected with [`ChatError::EmptyMessage`] and a submit
    /// while a reply is pending with [`ChatError::Busy`]; neither touches the
    /// conversation. On acceptance the user message is appended at once and
    /// the reply is scheduled on the current Tokio runtime.
    pub fn submit(&self, query: &str) -> Result<PendingReply, ChatError> {
        if query.trim().is_empty() {
            tracing::debug!("Ignoring blank submit");
            return Err(ChatError::EmptyMessage);
        }
        let runtime = Handle::try_current().map_err(|e| ChatError::Internal(e.to_string()))?;

        let (user_message, session_id) = {
            let mut session = self.shared.lock()?;
            if session.state.transition(AssistantState::Processing).is_err() {
                tracing::debug!("Ignoring submit while a reply is pending");
                return Err(ChatError::Busy);
            }
            match session.conversation.append(Role::User, query) {
                Ok(message) => {
                    self.shared.state_tx.send_replace(AssistantState::Processing);
                    self.shared.publish(&message);
                    (message, session.conversation.session_id())
                }
                Err(e) => {
                    session.state.transition(AssistantState::Idle)?;
                    return Err(e);
                }
            }
        };

        tracing::info!(
            %session_id,
            message_id = %user_message.id,
            delay_ms = self.shared.config.response_delay.as_millis() as u64,
            "Question accepted"
        );

        let shared = Arc::clone(&self.shared);
        let handle = runtime.spawn(shared.complete(query.to_string(), session_id));

        Ok(PendingReply {
            user_message,
            handle,
        })
    }

    /// Start over with a fresh conversation holding only the greeting.
    ///
    /// Rejected with [`ChatError::Busy`] while a reply is pending.
    pub fn reset(&self) -> Result<Uuid, ChatError> {
        let session_id = {
            let mut session = self.shared.lock()?;
            if session.state.current().is_processing() {
                tracing::debug!("Ignoring reset while a reply is pending");
                return Err(ChatError::Busy);
            }
            session.conversation = ConversationStore::new(&self.shared.config.greeting);
            if let Some(greeting) = session.conversation.messages().first() {
                self.shared.publish(greeting);
            }
            session.conversation.session_id()
        };
        tracing::info!(%session_id, "Conversation reset");
        Ok(session_id)
    }

    /// Ordered copy of the conversation.
    pub fn snapshot(&self) -> Vec<Message> {
        self.shared.read().conversation.snapshot()
    }

    pub fn len(&self) -> usize {
        self.shared.read().conversation.len()
    }

    /// Always false: a conversation starts with its greeting.
    pub fn is_empty(&self) -> bool {
        self.shared.read().conversation.is_empty()
    }

    pub fn state(&self) -> AssistantState {
        self.shared.read().state.current()
    }

    /// Whether a reply is pending. Views use this to disable input.
    pub fn is_processing(&self) -> bool {
        self.state().is_processing()
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.read().conversation.session_id()
    }

    /// Receiver notified on every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<AssistantState> {
        self.shared.state_tx.subscribe()
    }

    /// Receiver for every message appended after this call, including the
    /// greeting of a reset conversation.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<Message> {
        self.shared.message_tx.subscribe()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    pub fn generator(&self) -> &ResponseGenerator {
        &self.shared.generator
    }
}

// =============================================================================
// Tests
// =============================================================================
