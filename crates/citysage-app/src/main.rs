//! CitySage application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the knowledge base, suggested prompts and response scheduler
//! 4. Run the requested command (interactive chat by default)

mod cli;
mod view;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use citysage_chat::{Composer, KnowledgeBase, ResponseScheduler, SchedulerConfig, SuggestedPrompts};
use citysage_core::config::CitySageConfig;
use citysage_core::error::CitySageError;

use crate::cli::{CliArgs, Command};
use crate::view::ChatView;

/// Read the config file when it exists or was named explicitly, otherwise
/// use the defaults.
fn load_config(path: &Path, explicit: bool) -> CitySageConfig {
    if explicit || path.exists() {
        CitySageConfig::load_or_default(path)
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        CitySageConfig::default()
    }
}

/// Build the scheduler and prompt list from the resolved configuration.
fn build_assistant(
    config: &CitySageConfig,
    delay_ms: u64,
) -> Result<(ResponseScheduler, SuggestedPrompts), CitySageError> {
    let knowledge = Arc::new(KnowledgeBase::from_config(&config.knowledge.entries)?);
    let mut scheduler_config = SchedulerConfig::from(&config.assistant);
    scheduler_config.response_delay = Duration::from_millis(delay_ms);

    tracing::info!(
        topics = knowledge.len(),
        delay_ms,
        "Knowledge base ready"
    );

    let scheduler = ResponseScheduler::new(knowledge, scheduler_config);
    let prompts = SuggestedPrompts::from_config(&config.prompts);
    Ok((scheduler, prompts))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    // The configured log level is not known yet; load problems still surface as warnings.
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        load_config(&config_path, args.config_is_explicit())
    });

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting CitySage v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_path.display(), "Configuration resolved");

    let command = args.command();
    if let Command::InitConfig { force } = command {
        if config_path.exists() && !force {
            eprintln!(
                "{} already exists; pass --force to overwrite",
                config_path.display()
            );
            return Ok(());
        }
        CitySageConfig::default().save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let delay_ms = args.resolve_delay_ms(config.assistant.response_delay_ms);
    let (scheduler, prompts) = build_assistant(&config, delay_ms)?;

    match command {
        Command::Prompts => {
            for (i, prompt) in prompts.iter().enumerate() {
                println!("{}. {}", i + 1, prompt);
            }
        }
        Command::Ask { question } => {
            let question = question.join(" ");
            let reply = scheduler.submit(&question)?.wait().await?;
            println!("{}", reply.content);
        }
        Command::Chat => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            ChatView::new(scheduler, Composer::new(prompts))
                .run(stdin, &mut stdout)
                .await?;
        }
        Command::InitConfig { .. } => {}
    }

    tracing::info!("CitySage exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use citysage_core::config::KnowledgeEntryConfig;

    #[test]
    fn test_build_assistant_defaults() {
        let config = CitySageConfig::default();
        let (scheduler, prompts) = build_assistant(&config, 1500).unwrap();
        assert_eq!(scheduler.config().response_delay, Duration::from_millis(1500));
        assert_eq!(scheduler.generator().matcher().knowledge().len(), 6);
        assert_eq!(prompts.len(), 6);
    }

    #[test]
    fn test_build_assistant_delay_override() {
        let config = CitySageConfig::default();
        let (scheduler, _) = build_assistant(&config, 0).unwrap();
        assert_eq!(scheduler.config().response_delay, Duration::ZERO);
    }

    #[test]
    fn test_build_assistant_invalid_knowledge() {
        let mut config = CitySageConfig::default();
        config.knowledge.entries.push(KnowledgeEntryConfig {
            keyword: String::new(),
            response: "orphan".to_string(),
        });
        let err = build_assistant(&config, 0).unwrap_err();
        assert!(matches!(err, CitySageError::Chat(_)));
    }

    #[test]
    fn test_load_config_missing_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml"), false);
        assert_eq!(config.assistant.response_delay_ms, 1500);
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[assistant]\nresponse_delay_ms = 7\n").unwrap();
        let config = load_config(&path, false);
        assert_eq!(config.assistant.response_delay_ms, 7);
    }

    #[test]
    fn test_load_config_invalid_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "assistant = [[[").unwrap();
        let config = load_config(&path, true);
        assert_eq!(config.assistant.response_delay_ms, 1500);

        let absent = load_config(&dir.path().join("absent.toml"), true);
        assert_eq!(absent.assistant.response_delay_ms, 1500);
    }
}
