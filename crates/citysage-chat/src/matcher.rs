//! Case-insensitive substring lookup against the knowledge base.

use std::sync::Arc;

use crate::knowledge::{KnowledgeBase, KnowledgeEntry};

/// Finds the first knowledge entry whose keyword occurs in a question.
#[derive(Debug, Clone)]
pub struct Matcher {
    knowledge: Arc<KnowledgeBase>,
}

impl Matcher {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Look up `query` in insertion order.
    ///
    /// The query is only lower-cased: whitespace, punctuation and word
    /// boundaries are left alone, so `"smart citys"` still hits `"smart city"`.
    /// The first entry whose keyword is a substring wins.
    pub fn lookup(&self, query: &str) -> Option<&KnowledgeEntry> {
        let normalized = query.to_lowercase();
        self.knowledge
            .iter()
            .find(|entry| normalized.contains(entry.keyword()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher_with(entries: &[(&str, &str)]) -> Matcher {
        let entries = entries
            .iter()
            .map(|(k, r)| KnowledgeEntry::new(*k, *r).unwrap())
            .collect();
        Matcher::new(Arc::new(KnowledgeBase::from_entries(entries)))
    }

    #[test]
    fn test_case_insensitive_match() {
        let m = matcher_with(&[("carbon emissions", "R1")]);
        let hit = m.lookup("How can my city reduce Carbon Emissions?").unwrap();
        assert_eq!(hit.response(), "R1");
    }

    #[test]
    fn test_first_match_wins() {
        let m = matcher_with(&[("water", "R_water"), ("waste", "R_waste")]);
        let hit = m.lookup("water and waste management").unwrap();
        assert_eq!(hit.response(), "R_water");
    }

    #[test]
    fn test_priority_is_insertion_order_not_position_in_query() {
        let m = matcher_with(&[("water", "R_water"), ("waste", "R_waste")]);
        let hit = m.lookup("waste before water").unwrap();
        assert_eq!(hit.response(), "R_water");
    }

    #[test]
    fn test_duplicate_keyword_earliest_shadows() {
        let m = matcher_with(&[("water", "first"), ("water", "second")]);
        assert_eq!(m.lookup("water").unwrap().response(), "first");
    }

    #[test]
    fn test_no_match() {
        let m = matcher_with(&[("water", "R_water")]);
        assert!(m.lookup("xyz123").is_none());
    }

    #[test]
    fn test_empty_query() {
        let m = Matcher::new(Arc::new(KnowledgeBase::builtin()));
        assert!(m.lookup("").is_none());
    }

    #[test]
    fn test_empty_knowledge_base() {
        let m = Matcher::new(Arc::new(KnowledgeBase::default()));
        assert!(m.lookup("carbon emissions").is_none());
    }

    #[test]
    fn test_substring_ignores_word_boundaries() {
        let m = matcher_with(&[("smart city", "R_smart")]);
        assert!(m.lookup("SMART CITYSCAPES").is_some());
    }

    #[test]
    fn test_internal_whitespace_not_collapsed() {
        let m = matcher_with(&[("green building", "R")]);
        assert!(m.lookup("green  building").is_none());
        assert!(m.lookup("  Green Building  ").is_some());
    }

    #[test]
    fn test_builtin_suggested_questions_hit_their_topics() {
        let m = Matcher::new(Arc::new(KnowledgeBase::builtin()));
        let cases = [
            ("How can my city reduce carbon emissions?", "carbon emissions"),
            (
                "What are the best practices for waste management?",
                "waste management",
            ),
            ("How to improve public transportation?", "public transportation"),
            ("What are green building standards?", "green building"),
            ("How to increase citizen engagement?", "citizen engagement"),
            ("What are smart city technologies?", "smart city"),
        ];
        for (query, keyword) in cases {
            assert_eq!(m.lookup(query).unwrap().keyword(), keyword, "{}", query);
        }
    }

    #[test]
    fn test_builtin_overlap_prefers_carbon() {
        let m = Matcher::new(Arc::new(KnowledgeBase::builtin()));
        let hit = m
            .lookup("Does waste management help a smart city cut carbon emissions?")
            .unwrap();
        assert_eq!(hit.keyword(), "carbon emissions");
    }
}
