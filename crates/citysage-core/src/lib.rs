//! Shared types, errors, and configuration for the CitySage assistant.

pub mod config;
pub mod error;
pub mod types;

pub use config::CitySageConfig;
pub use error::{CitySageError, Result};
pub use types::*;
