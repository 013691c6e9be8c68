//! Data models and types for the engine.
//!
//! Contains domain types for:
//! - [`FsNode`], [`FileNode`], [`LinkFile`] - Virtual filesystem representation
//! - [`Output`], [`HistoryEntry`], [`Scrollback`] - Terminal output types

mod filesystem;
mod terminal;

pub use filesystem::{FileNode, FsNode, LinkFile, TextFile};
pub use terminal::{HistoryEntry, Output, Scrollback};
