//! Core engine logic for the terminal session.
//!
//! This module provides:
//! - [`path`] normalization and resolution
//! - [`VirtualFs`] virtual filesystem lookup
//! - [`CommandRegistry`] and [`execute_line`] for command dispatch
//! - [`RecallStack`] for up/down line recall
//! - [`Completer`] for tab completion

mod autocomplete;
mod commands;
pub mod error;
mod filesystem;
mod history;
pub mod path;

pub use autocomplete::{
    AutocompleteResult, Completer, Completion, CompletionState, Cycle, longest_common_prefix,
};
pub use commands::{
    Builtin, Command, CommandContext, CommandHandler, CommandRegistry, CommandResult,
    CompletionPolicy, CustomCommand, FileScope, SessionEffect, ShellState, execute_builtin,
    execute_line,
};
pub use filesystem::{VirtualFs, lookup};
pub use history::{Direction, Recall, RecallStack};
