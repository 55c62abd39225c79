//! CLI argument definitions for the CitySage application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CitySage: a Smart City sustainability assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "citysage", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Simulated reply latency in milliseconds.
    #[arg(long = "delay-ms", global = true)]
    pub delay_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat session (default).
    Chat,
    /// Ask a single question and print the reply.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// List the suggested questions.
    Prompts,
    /// Write a config file populated with the defaults.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl CliArgs {
    /// The subcommand to run, defaulting to an interactive chat.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }

    /// Whether the config path was chosen explicitly rather than defaulted.
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some() || std::env::var_os("CITYSAGE_CONFIG").is_some()
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CITYSAGE_CONFIG env var > ~/.citysage/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CITYSAGE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > CITYSAGE_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(level) = std::env::var("CITYSAGE_LOG") {
            if !level.trim().is_empty() {
                return level;
            }
        }
        config_level.to_string()
    }

    /// Resolve the reply delay. Priority: --delay-ms flag > config file value.
    pub fn resolve_delay_ms(&self, config_delay_ms: u64) -> u64 {
        self.delay_ms.unwrap_or(config_delay_ms)
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".citysage").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".citysage").join("config.toml");
    }
    PathBuf::from("config.toml")
}
