use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Greeting seeded as the first assistant message of every conversation.
pub const DEFAULT_GREETING: &str = "Hello! I'm your Smart City AI Assistant powered by IBM Granite LLM. I can help you with urban sustainability questions, policy information, eco-friendly tips, and city planning insights. How can I assist you today?";

/// Simulated generation latency applied to every reply.
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 1500;

/// Top-level configuration for the CitySage assistant.
///
/// Loaded from `~/.citysage/config.toml` by default. Every section is
/// optional; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitySageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl CitySageConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CitySageConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversational assistant behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Simulated generation latency in milliseconds.
    pub response_delay_ms: u64,
    /// First assistant message of a fresh conversation.
    pub greeting: String,
    /// Buffer size of the message broadcast channel.
    pub event_capacity: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: DEFAULT_RESPONSE_DELAY_MS,
            greeting: DEFAULT_GREETING.to_string(),
            event_capacity: 64,
        }
    }
}

/// Suggested prompts offered to the user. Empty means use the built-in list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub suggested: Vec<String>,
}

/// Knowledge base override. Empty means use the built-in topics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Entries in match-priority order.
    pub entries: Vec<KnowledgeEntryConfig>,
}

/// One keyword/response pair as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntryConfig {
    pub keyword: String,
    pub response: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CitySageError;
    use std::io::Write;

    fn create_temp_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CitySageConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.assistant.response_delay_ms, 1500);
        assert_eq!(config.assistant.greeting, DEFAULT_GREETING);
        assert_eq!(config.assistant.event_capacity, 64);
        assert!(config.prompts.suggested.is_empty());
        assert!(config.knowledge.entries.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[assistant]
response_delay_ms = 250
greeting = "Hi there"

[prompts]
suggested = ["How do I recycle batteries?"]

[[knowledge.entries]]
keyword = "water"
response = "R_water"

[[knowledge.entries]]
keyword = "waste"
response = "R_waste"
"#;
        let file = create_temp_config(content);
        let config = CitySageConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.assistant.response_delay_ms, 250);
        assert_eq!(config.assistant.greeting, "Hi there");
        assert_eq!(config.assistant.event_capacity, 64);
        assert_eq!(config.prompts.suggested, vec!["How do I recycle batteries?"]);
        assert_eq!(config.knowledge.entries.len(), 2);
        assert_eq!(config.knowledge.entries[0].keyword, "water");
        assert_eq!(config.knowledge.entries[1].keyword, "waste");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[assistant]
response_delay_ms = 10
"#;
        let file = create_temp_config(content);
        let config = CitySageConfig::load(file.path()).unwrap();
        assert_eq!(config.assistant.response_delay_ms, 10);
        assert_eq!(config.assistant.greeting, DEFAULT_GREETING);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = CitySageConfig::load(file.path()).unwrap();
        assert_eq!(config.assistant.response_delay_ms, DEFAULT_RESPONSE_DELAY_MS);
        assert!(config.knowledge.entries.is_empty());
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let file = create_temp_config("[assistant\nresponse_delay_ms = ");
        let result = CitySageConfig::load(file.path());
        assert!(matches!(result, Err(CitySageError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = CitySageConfig::load(Path::new("/nonexistent/citysage/config.toml"));
        assert!(matches!(result, Err(CitySageError::Io(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = CitySageConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.assistant.response_delay_ms, DEFAULT_RESPONSE_DELAY_MS);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = CitySageConfig::default();
        config.assistant.response_delay_ms = 42;
        config.knowledge.entries.push(KnowledgeEntryConfig {
            keyword: "solar".to_string(),
            response: "Panels.\n\n• Rooftops".to_string(),
        });
        config.save(&path).unwrap();

        let reloaded = CitySageConfig::load(&path).unwrap();
        assert_eq!(reloaded.assistant.response_delay_ms, 42);
        assert_eq!(reloaded.knowledge.entries, config.knowledge.entries);
        assert_eq!(reloaded.assistant.greeting, config.assistant.greeting);
    }

    #[test]
    fn test_save_into_unwritable_parent_is_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot act as a directory.
        let path = file.path().join("config.toml");
        let result = CitySageConfig::default().save(&path);
        assert!(matches!(result, Err(CitySageError::Io(_))));
    }
}
