//! Shell session engine over an in-memory virtual filesystem.
//!
//! A [`Session`] accepts typed lines, resolves paths against a read-only
//! tree of directories, text files and link files, and records what each
//! command printed. Rendering is left to the embedding application: the
//! engine only produces [`Output`] values and [`HistoryEntry`] records.
//!
//! ```
//! use vfsh::{FsNode, Output, Session};
//!
//! let tree = FsNode::dir([("docs", FsNode::dir([("a.txt", FsNode::text("hi"))]))]);
//! let mut session = Session::new(tree, "/");
//!
//! session.set_input("cat docs/a.txt");
//! let entry = session.submit();
//! assert_eq!(entry.output, Some(Output::text("hi")));
//! ```

pub mod config;
pub mod core;
pub mod models;
mod session;

pub use config::SessionConfig;
pub use crate::core::error::{CommandError, ConfigError, RegistryError, TreeError};
pub use crate::core::{
    CommandContext, CommandHandler, CommandRegistry, CompletionPolicy, CompletionState,
    CustomCommand, Direction, FileScope, VirtualFs,
};
pub use models::{FileNode, FsNode, HistoryEntry, LinkFile, Output, Scrollback, TextFile};
pub use session::{Session, SessionBuilder};
