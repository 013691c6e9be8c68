//! Command registry: built-ins plus caller-supplied commands.
//!
//! The registry is a lookup table keyed by command name. It starts out
//! holding every [`Builtin`]; registering a custom command under an existing
//! name replaces that entry, so caller commands win on collision.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::core::error::{CommandError, RegistryError};
use crate::core::{VirtualFs, path};
use crate::models::{FileNode, FsNode, Output};

use super::Builtin;

/// Valid custom command names: one token that can be typed at the prompt.
static COMMAND_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("command name pattern is valid")
});

// =============================================================================
// Completion Policy
// =============================================================================

/// Which filesystem entries a path completion may offer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileScope {
    #[default]
    Any,
    Directories,
    /// Files of either kind
    Files,
    TextFiles,
    LinkFiles,
}

impl FileScope {
    /// Check if a node passes this filter.
    pub fn matches(self, node: &FsNode) -> bool {
        match self {
            Self::Any => true,
            Self::Directories => node.is_directory(),
            Self::Files => !node.is_directory(),
            Self::TextFiles => matches!(node, FsNode::File(FileNode::Text(_))),
            Self::LinkFiles => matches!(node, FsNode::File(FileNode::Link(_))),
        }
    }
}

/// How Tab completes the arguments of a command.
///
/// Commands without an explicit policy get [`CompletionPolicy::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// No argument completion
    #[default]
    None,
    /// Complete path segments, offering entries that pass the filter
    Paths(FileScope),
}

// =============================================================================
// Custom Commands
// =============================================================================

/// Read-only view of the session handed to custom command handlers.
#[derive(Clone, Copy, Debug)]
pub struct CommandContext<'a> {
    fs: &'a VirtualFs,
    current_path: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn new(fs: &'a VirtualFs, current_path: &'a str) -> Self {
        Self { fs, current_path }
    }

    /// Resolve a path argument against the current directory.
    pub fn resolve(&self, target: &str) -> String {
        path::resolve(target, self.current_path)
    }

    /// Look up a node by absolute path.
    pub fn lookup(&self, absolute: &str) -> Option<&'a FsNode> {
        self.fs.get_entry(absolute)
    }

    /// The current directory node, if the current path still resolves.
    pub fn current_dir(&self) -> Option<&'a FsNode> {
        self.fs.get_entry(self.current_path)
    }

    pub fn current_path(&self) -> &'a str {
        self.current_path
    }
}

/// Handler behind a custom command.
///
/// Implemented for any `Fn(&[String], &CommandContext) -> Result<Output, CommandError>`.
pub trait CommandHandler: Send + Sync {
    fn run(&self, args: &[String], ctx: &CommandContext<'_>) -> Result<Output, CommandError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[String], &CommandContext<'_>) -> Result<Output, CommandError> + Send + Sync,
{
    fn run(&self, args: &[String], ctx: &CommandContext<'_>) -> Result<Output, CommandError> {
        self(args, ctx)
    }
}

/// A caller-supplied command: handler plus completion policy.
#[derive(Clone)]
pub struct CustomCommand {
    handler: Arc<dyn CommandHandler>,
    completion: CompletionPolicy,
}

impl CustomCommand {
    /// Create a command from a closure. Arguments are not completed.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&[String], &CommandContext<'_>) -> Result<Output, CommandError>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(handler)
    }

    /// Create a command from any handler implementation.
    pub fn from_handler(handler: impl CommandHandler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            completion: CompletionPolicy::None,
        }
    }

    pub fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    pub fn completion(&self) -> CompletionPolicy {
        self.completion
    }

    pub fn run(&self, args: &[String], ctx: &CommandContext<'_>) -> Result<Output, CommandError> {
        self.handler.run(args, ctx)
    }
}

impl fmt::Debug for CustomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCommand")
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// A registry entry.
#[derive(Clone, Debug)]
pub enum Command {
    Builtin(Builtin),
    Custom(CustomCommand),
}

impl Command {
    pub fn completion(&self) -> CompletionPolicy {
        match self {
            Self::Builtin(builtin) => builtin.completion(),
            Self::Custom(custom) => custom.completion(),
        }
    }
}

/// Name → command table, pre-populated with the built-ins.
#[derive(Clone, Debug)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    /// Names in registration order (built-ins first)
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            order: Vec::new(),
        };
        for builtin in Builtin::ALL {
            registry.insert(builtin.name(), Command::Builtin(builtin));
        }
        registry
    }

    /// Register a custom command, replacing any entry with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        command: CustomCommand,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if !COMMAND_NAME.is_match(&name) {
            return Err(RegistryError::InvalidName(name));
        }
        self.insert(&name, Command::Custom(command));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(
        mut self,
        name: impl Into<String>,
        command: CustomCommand,
    ) -> Result<Self, RegistryError> {
        self.register(name, command)?;
        Ok(self)
    }

    fn insert(&mut self, name: &str, command: Command) {
        if self.commands.insert(name.to_string(), command).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All known command names, built-ins first, then custom commands in
    /// registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Completion policy for a known command.
    pub fn completion(&self, name: &str) -> Option<CompletionPolicy> {
        self.get(name).map(Command::completion)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
