//! Custom error types for the engine.
//!
//! None of these surface from interactive operations: the session turns
//! every failure inside a command into a displayable entry. They cover the
//! setup boundary instead:
//!
//! - [`TreeError`] - building a filesystem from JSON
//! - [`ConfigError`] - parsing a [`SessionConfig`](crate::SessionConfig)
//! - [`RegistryError`] - registering a custom command
//! - [`CommandError`] - failures reported by custom command handlers

use thiserror::Error;

/// Errors while loading a virtual filesystem tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The document does not match the tree shape
    #[error("invalid filesystem tree: {0}")]
    Parse(#[from] serde_json::Error),
    /// The root node is a file
    #[error("filesystem root must be a directory")]
    RootNotDirectory,
}

/// Errors while parsing a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} must be greater than 0")]
    ZeroLimit(&'static str),
}

/// Errors while registering a custom command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Names must be a single token of `[A-Za-z0-9_.-]` characters
    #[error("invalid command name: {0:?}")]
    InvalidName(String),
}

/// Failure reported by a custom command handler.
///
/// The message is logged; the user only sees `error: executing <name>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
