//! Templated reply used when no keyword matches.

/// Topics listed in every fallback reply.
const TOPIC_MENU: [&str; 7] = [
    "Urban sustainability and environmental policies",
    "Infrastructure planning and optimization",
    "Citizen engagement strategies",
    "Green technology implementation",
    "Public transportation systems",
    "Waste management solutions",
    "Energy efficiency measures",
];

/// Produces the generic reply for unmatched questions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSynthesizer;

impl FallbackSynthesizer {
    /// Build the fallback text. `query` is embedded verbatim.
    pub fn synthesize(&self, query: &str) -> String {
        let menu = TOPIC_MENU
            .iter()
            .map(|topic| format!("• {}", topic))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Thank you for your question about \"{}\". As your Smart City AI Assistant, I can provide insights on:\n\n{}\n\nCould you please be more specific about which aspect you'd like to explore? I'm here to help with detailed, actionable advice for your city's needs.",
            query, menu
        )
    }

    pub fn topics(&self) -> &'static [&'static str] {
        &TOPIC_MENU
    }
}
