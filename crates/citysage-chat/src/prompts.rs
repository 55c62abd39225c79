//! Suggested prompts and the pending-input composer.
//!
//! Picking a suggestion only fills the composer; it is matched against the
//! knowledge base once the user actually submits it.

use citysage_core::config::PromptsConfig;

use crate::error::ChatError;
use crate::scheduler::{PendingReply, ResponseScheduler};

const BUILTIN_PROMPTS: [&str; 6] = [
    "How can my city reduce carbon emissions?",
    "What are the best practices for waste management?",
    "How to improve public transportation?",
    "What are green building standards?",
    "How to increase citizen engagement?",
    "What are smart city technologies?",
];

// =============================================================================
// SuggestedPrompts
// =============================================================================

/// Fixed, ordered list of example questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPrompts {
    prompts: Vec<String>,
}

impl Default for SuggestedPrompts {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SuggestedPrompts {
    pub fn builtin() -> Self {
        Self {
            prompts: BUILTIN_PROMPTS.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Use the configured prompts, or the built-in ones when none are set.
    /// Blank entries are skipped.
    pub fn from_config(config: &PromptsConfig) -> Self {
        let prompts: Vec<String> = config
            .suggested
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect();
        if prompts.is_empty() {
            Self::builtin()
        } else {
            Self { prompts }
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.prompts.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

// =============================================================================
// Composer
// =============================================================================

/// A key press delivered by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Char(char),
    Backspace,
}

/// What the view should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Submit the current input.
    Submit,
    /// Input was edited; nothing else to do.
    Edited,
}

/// Pending input text owned by the view.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    text: String,
    prompts: SuggestedPrompts,
}

impl Composer {
    pub fn new(prompts: SuggestedPrompts) -> Self {
        Self {
            text: String::new(),
            prompts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn prompts(&self) -> &SuggestedPrompts {
        &self.prompts
    }

    /// Copy suggestion `index` into the input, replacing what was there.
    pub fn select_suggestion(&mut self, index: usize) -> Result<&str, ChatError> {
        let prompt = self
            .prompts
            .get(index)
            .ok_or(ChatError::UnknownSuggestion(index))?;
        self.text = prompt.to_string();
        Ok(&self.text)
    }

    /// Whether the send control should be enabled.
    pub fn can_submit(&self, processing: bool) -> bool {
        !processing && !self.text.trim().is_empty()
    }

    /// Enter submits; Shift+Enter inserts a newline.
    pub fn handle_key(&mut self, key: Key) -> KeyAction {
        match key {
            Key::Enter { shift: false } => KeyAction::Submit,
            Key::Enter { shift: true } => {
                self.text.push('\n');
                KeyAction::Edited
            }
            Key::Char(c) => {
                self.text.push(c);
                KeyAction::Edited
            }
            Key::Backspace => {
                self.text.pop();
                KeyAction::Edited
            }
        }
    }

    /// Hand the input to the scheduler. The input is cleared only if the
    /// question was accepted, so a rejected submit can simply be retried.
    pub fn submit_to(&mut self, scheduler: &ResponseScheduler) -> Result<PendingReply, ChatError> {
        let pending = scheduler.submit(&self.text)?;
        self.text.clear();
        Ok(pending)
    }
}

// =============================================================================
// Tests
// =============================================================================
