//! Command execution result type.

use crate::models::Output;

/// A change the session must apply after a command runs.
///
/// Commands never mutate the session directly; they describe the change and
/// the session applies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEffect {
    /// Move to this absolute directory, stashing the old one for `cd -`
    ChangeDirectory(String),
    /// Empty the scrollback and skip recording this command in it
    ClearScrollback,
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Output to display, if any
    pub output: Option<Output>,
    /// Optional session change (e.g., for `cd`)
    pub effect: Option<SessionEffect>,
}

impl CommandResult {
    /// Create a result with just output.
    pub fn output(output: Output) -> Self {
        Self {
            output: Some(output),
            effect: None,
        }
    }

    /// Create a result carrying an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::output(Output::error(message))
    }

    /// Create a directory change with optional output.
    pub fn change_directory(path: impl Into<String>, output: Option<Output>) -> Self {
        Self {
            output,
            effect: Some(SessionEffect::ChangeDirectory(path.into())),
        }
    }

    /// Create a scrollback clear.
    pub fn clear() -> Self {
        Self {
            output: None,
            effect: Some(SessionEffect::ClearScrollback),
        }
    }

    /// Create an empty result (no output, no effect).
    pub fn empty() -> Self {
        Self {
            output: None,
            effect: None,
        }
    }

    /// Output text, if the result carries text or an error.
    pub fn text(&self) -> Option<&str> {
        self.output.as_ref().and_then(Output::as_text)
    }
}
