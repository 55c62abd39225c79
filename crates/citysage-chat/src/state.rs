//! Assistant state machine.
//!
//! Enforces the two-state reply cycle:
//! - Idle -> Processing (question accepted)
//! - Processing -> Idle (reply appended)
//!
//! There is no cancel edge: once a question is accepted its reply always lands.

use std::fmt;

use crate::error::ChatError;

/// Operational state of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistantState {
    /// Ready to accept a question.
    Idle,
    /// A reply is being generated; new questions are rejected.
    Processing,
}

impl fmt::Display for AssistantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantState::Idle => write!(f, "Idle"),
            AssistantState::Processing => write!(f, "Processing"),
        }
    }
}

impl AssistantState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &AssistantState) -> bool {
        matches!(
            (self, target),
            (AssistantState::Idle, AssistantState::Processing)
                | (AssistantState::Processing, AssistantState::Idle)
        )
    }

    pub fn is_processing(&self) -> bool {
        *self == AssistantState::Processing
    }
}

/// Validating wrapper around `AssistantState`.
///
/// Not synchronized on its own; the scheduler keeps it under the same lock
/// as the conversation so a transition and its append happen together.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: AssistantState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: AssistantState::Idle,
        }
    }

    pub fn current(&self) -> AssistantState {
        self.state
    }

    /// Attempt to transition to the target state.
    pub fn transition(&mut self, target: AssistantState) -> Result<(), ChatError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Assistant state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(ChatError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(AssistantState::Idle.to_string(), "Idle");
        assert_eq!(AssistantState::Processing.to_string(), "Processing");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(AssistantState::Idle.can_transition_to(&AssistantState::Processing));
        assert!(AssistantState::Processing.can_transition_to(&AssistantState::Idle));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!AssistantState::Idle.can_transition_to(&AssistantState::Idle));
        assert!(!AssistantState::Processing.can_transition_to(&AssistantState::Processing));
    }

    #[test]
    fn test_state_machine_cycle() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.current(), AssistantState::Idle);

        sm.transition(AssistantState::Processing).unwrap();
        assert!(sm.current().is_processing());

        sm.transition(AssistantState::Idle).unwrap();
        assert_eq!(sm.current(), AssistantState::Idle);
    }

    #[test]
    fn test_double_processing_rejected() {
        let mut sm = StateMachine::new();
        sm.transition(AssistantState::Processing).unwrap();
        let err = sm.transition(AssistantState::Processing).unwrap_err();
        match err {
            ChatError::InvalidTransition { from, to } => {
                assert_eq!(from, AssistantState::Processing);
                assert_eq!(to, AssistantState::Processing);
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
        assert!(sm.current().is_processing());
    }

    #[test]
    fn test_idle_to_idle_rejected() {
        let mut sm = StateMachine::default();
        assert!(sm.transition(AssistantState::Idle).is_err());
        assert_eq!(sm.current(), AssistantState::Idle);
    }
}
