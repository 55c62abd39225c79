//! Response generation for chat queries.
//!
//! Composes an answer from the knowledge base when a topic keyword is
//! mentioned, or from the fallback template otherwise. No model is involved.

use std::sync::Arc;

use crate::fallback::FallbackSynthesizer;
use crate::knowledge::KnowledgeBase;
use crate::matcher::Matcher;

/// Where a reply's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// A knowledge entry matched on `keyword`.
    Knowledge { keyword: String },
    /// Nothing matched; the fallback template was used.
    Fallback,
}

/// Generated assistant text plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.source == ReplySource::Fallback
    }
}

/// Generates assistant replies from user questions.
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    matcher: Matcher,
    fallback: FallbackSynthesizer,
}

impl ResponseGenerator {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            matcher: Matcher::new(knowledge),
            fallback: FallbackSynthesizer,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Produce the reply for `query`. Total: every input yields some text.
    pub fn generate(&self, query: &str) -> Reply {
        match self.matcher.lookup(query) {
            Some(entry) => Reply {
                text: entry.response().to_string(),
                source: ReplySource::Knowledge {
                    keyword: entry.keyword().to_string(),
                },
            },
            None => Reply {
                text: self.fallback.synthesize(query),
                source: ReplySource::Fallback,
            },
        }
    }
}
