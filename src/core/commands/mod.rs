//! Command dispatch and execution.
//!
//! This module provides:
//! - [`Builtin`] for the commands every session understands
//! - [`CommandRegistry`] for built-ins plus caller-supplied commands
//! - [`CommandResult`] for command execution results
//! - [`execute_line`] for running one input line
//!
//! # Architecture
//!
//! A line is split on whitespace into a name and arguments. The name is
//! looked up in the registry: custom commands get a read-only
//! [`CommandContext`], built-ins get the [`ShellState`] snapshot. Either way
//! the result describes output plus an optional [`SessionEffect`]; the
//! session applies the effect afterwards.

mod execute;
mod registry;
mod result;

pub use execute::execute_builtin;
pub use registry::{
    Command, CommandContext, CommandHandler, CommandRegistry, CompletionPolicy, CustomCommand,
    FileScope,
};
pub use result::{CommandResult, SessionEffect};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::core::VirtualFs;
use crate::models::Output;

// =============================================================================
// Builtin Commands
// =============================================================================

/// Commands available in every session unless a custom command replaces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Help,
    Ls,
    Cd,
    Cat,
    Echo,
    Pwd,
    Clear,
}

impl Builtin {
    /// All built-ins in `help` order.
    pub const ALL: [Builtin; 7] = [
        Self::Help,
        Self::Ls,
        Self::Cd,
        Self::Cat,
        Self::Echo,
        Self::Pwd,
        Self::Clear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Ls => "ls",
            Self::Cd => "cd",
            Self::Cat => "cat",
            Self::Echo => "echo",
            Self::Pwd => "pwd",
            Self::Clear => "clear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Argument completion for this built-in.
    pub fn completion(self) -> CompletionPolicy {
        match self {
            Self::Cd => CompletionPolicy::Paths(FileScope::Directories),
            Self::Ls | Self::Cat => CompletionPolicy::Paths(FileScope::Any),
            Self::Help | Self::Echo | Self::Pwd | Self::Clear => CompletionPolicy::None,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Snapshot of the session that built-ins read from.
#[derive(Clone, Copy, Debug)]
pub struct ShellState<'a> {
    pub fs: &'a VirtualFs,
    pub current_path: &'a str,
    /// Directory active before the last successful `cd`
    pub previous_path: Option<&'a str>,
}

/// Execute one input line.
///
/// Empty input yields an empty result. Failures never escape: unknown
/// names, bad arguments and failing custom handlers all become error output.
pub fn execute_line(line: &str, registry: &CommandRegistry, state: &ShellState<'_>) -> CommandResult {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return CommandResult::empty();
    };
    let args: Vec<String> = tokens.map(str::to_string).collect();

    tracing::debug!(command = name, args = args.len(), "dispatching command");

    match registry.get(name) {
        Some(Command::Custom(custom)) => execute_custom(name, custom, &args, state),
        Some(Command::Builtin(builtin)) => execute_builtin(*builtin, &args, registry, state),
        None => CommandResult::error(format!("command not found: {}", name)),
    }
}

/// Run a custom handler, converting errors and panics into error output.
fn execute_custom(
    name: &str,
    command: &CustomCommand,
    args: &[String],
    state: &ShellState<'_>,
) -> CommandResult {
    let ctx = CommandContext::new(state.fs, state.current_path);

    match panic::catch_unwind(AssertUnwindSafe(|| command.run(args, &ctx))) {
        Ok(Ok(output)) => CommandResult::output(output),
        Ok(Err(err)) => {
            tracing::error!(command = name, error = %err, "custom command failed");
            handler_failure(name)
        }
        Err(payload) => {
            tracing::error!(
                command = name,
                panic = panic_message(payload.as_ref()),
                "custom command panicked"
            );
            handler_failure(name)
        }
    }
}

fn handler_failure(name: &str) -> CommandResult {
    CommandResult::output(Output::error(format!("error: executing {}", name)))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CommandError;
    use crate::models::FsNode;

    fn create_test_fs() -> VirtualFs {
        VirtualFs::new(FsNode::dir([(
            "docs",
            FsNode::dir([("a.txt", FsNode::text("hi"))]),
        )]))
    }

    fn run(line: &str, registry: &CommandRegistry) -> CommandResult {
        let fs = create_test_fs();
        let state = ShellState {
            fs: &fs,
            current_path: "/",
            previous_path: None,
        };
        execute_line(line, registry, &state)
    }

    #[test]
    fn test_builtin_names() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("LS"), None);
        assert_eq!(Builtin::from_name("rm"), None);
    }

    #[test]
    fn test_empty_line() {
        let registry = CommandRegistry::new();
        assert_eq!(run("", &registry), CommandResult::empty());
        assert_eq!(run("   \t ", &registry), CommandResult::empty());
    }

    #[test]
    fn test_unknown_command() {
        let registry = CommandRegistry::new();
        let result = run("foobar --x", &registry);
        assert_eq!(
            result.output,
            Some(Output::error("command not found: foobar"))
        );
        assert_eq!(result.effect, None);
    }

    #[test]
    fn test_tokenizes_on_whitespace() {
        let registry = CommandRegistry::new();
        let result = run("  echo   a \t b  ", &registry);
        assert_eq!(result.text(), Some("a b"));
    }

    #[test]
    fn test_custom_command_receives_args_and_context() {
        let registry = CommandRegistry::new()
            .with(
                "peek",
                CustomCommand::new(|args, ctx| {
                    let target = ctx.resolve(&args[0]);
                    match ctx.lookup(&target) {
                        Some(FsNode::Directory(children)) => {
                            Ok(Output::text(format!("{} entries", children.len())))
                        }
                        Some(_) => Ok(Output::text("file")),
                        None => Err(CommandError::new("missing")),
                    }
                }),
            )
            .unwrap();

        assert_eq!(run("peek docs", &registry).text(), Some("1 entries"));
        assert_eq!(run("peek docs/a.txt", &registry).text(), Some("file"));
    }

    #[test]
    fn test_custom_command_overrides_builtin() {
        let registry = CommandRegistry::new()
            .with("pwd", CustomCommand::new(|_, _| Ok(Output::text("custom"))))
            .unwrap();
        assert_eq!(run("pwd", &registry).text(), Some("custom"));
    }

    #[test]
    fn test_custom_command_error_is_contained() {
        let registry = CommandRegistry::new()
            .with(
                "boom",
                CustomCommand::new(|_, _| Err(CommandError::new("kaput"))),
            )
            .unwrap();

        let result = run("boom", &registry);
        assert_eq!(result.output, Some(Output::error("error: executing boom")));
        assert_eq!(result.effect, None);
    }

    #[test]
    fn test_custom_command_panic_is_contained() {
        let registry = CommandRegistry::new()
            .with("crash", CustomCommand::new(|_, _| panic!("handler bug")))
            .unwrap();

        let result = run("crash now", &registry);
        assert_eq!(result.output, Some(Output::error("error: executing crash")));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
