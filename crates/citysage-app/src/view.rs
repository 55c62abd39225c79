//! Line-oriented terminal view over the response scheduler.
//!
//! Plain lines are questions. Slash commands browse the suggested prompts,
//! print the history, or reset the conversation.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use citysage_chat::{ChatError, Composer, ResponseScheduler};
use citysage_core::types::{Message, Role};

const HELP: &str = "Commands: /suggest, /use N, /send, /history, /reset, /help, /quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// Put the text in the composer and submit it.
    Ask(String),
    Suggest,
    /// Copy suggestion N (1-based) into the composer.
    Use(usize),
    /// Submit whatever is in the composer.
    Send,
    History,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl ViewCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return ViewCommand::Ask(line.to_string());
        };
        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("suggest"), None) => ViewCommand::Suggest,
            (Some("use"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => ViewCommand::Use(n),
                _ => ViewCommand::Unknown(trimmed.to_string()),
            },
            (Some("send"), None) => ViewCommand::Send,
            (Some("history"), None) => ViewCommand::History,
            (Some("reset"), None) => ViewCommand::Reset,
            (Some("help"), None) => ViewCommand::Help,
            (Some("quit"), None) | (Some("exit"), None) => ViewCommand::Quit,
            _ => ViewCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Format a message the way the chat pane shows it.
pub fn render_message(message: &Message) -> String {
    let author = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    format!("[{}] {}:\n{}\n", message.display_time(), author, message.content)
}

pub struct ChatView {
    scheduler: ResponseScheduler,
    composer: Composer,
}

impl ChatView {
    pub fn new(scheduler: ResponseScheduler, composer: Composer) -> Self {
        Self {
            scheduler,
            composer,
        }
    }

    /// Read lines from `input` until EOF or `/quit`.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        for message in self.scheduler.snapshot() {
            write!(out, "{}", render_message(&message))?;
        }
        writeln!(out, "{}", HELP)?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match ViewCommand::parse(&line) {
                ViewCommand::Ask(text) => {
                    self.composer.set_text(text);
                    self.submit(out).await?;
                }
                ViewCommand::Send => self.submit(out).await?,
                ViewCommand::Suggest => self.print_suggestions(out)?,
                ViewCommand::Use(n) => match self.composer.select_suggestion(n - 1) {
                    Ok(text) => writeln!(out, "Input: {}", text)?,
                    Err(e) => writeln!(out, "{}", e)?,
                },
                ViewCommand::History => {
                    for message in self.scheduler.snapshot() {
                        write!(out, "{}", render_message(&message))?;
                    }
                }
                ViewCommand::Reset => match self.scheduler.reset() {
                    Ok(_) => {
                        let snapshot = self.scheduler.snapshot();
                        if let Some(greeting) = snapshot.first() {
                            write!(out, "{}", render_message(greeting))?;
                        }
                    }
                    Err(e) => writeln!(out, "Cannot reset: {}", e)?,
                },
                ViewCommand::Help => writeln!(out, "{}", HELP)?,
                ViewCommand::Quit => break,
                ViewCommand::Unknown(cmd) => writeln!(out, "Unknown command: {}. {}", cmd, HELP)?,
            }
            out.flush()?;
        }
        Ok(())
    }

    fn print_suggestions<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Suggested questions:")?;
        for (i, prompt) in self.composer.prompts().iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, prompt)?;
        }
        Ok(())
    }

    async fn submit<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.composer.submit_to(&self.scheduler) {
            Ok(pending) => {
                writeln!(out, "Assistant is typing...")?;
                out.flush()?;
                match pending.wait().await {
                    Ok(reply) => write!(out, "{}", render_message(&reply))?,
                    Err(e) => {
                        tracing::error!(error = %e, "Reply failed");
                        writeln!(out, "Reply failed: {}", e)?;
                    }
                }
            }
            Err(ChatError::EmptyMessage) => {
                writeln!(out, "Type a question first, or /use N to pick a suggestion.")?
            }
            Err(ChatError::Busy) => {
                writeln!(out, "The assistant is still answering; try again in a moment.")?
            }
            Err(e) => writeln!(out, "Could not send: {}", e)?,
        }
        Ok(())
    }
}
