//! Built-in command execution.
//!
//! Contains the `execute_builtin` function that runs built-ins against the
//! virtual filesystem and returns results.

use crate::config::{EMPTY_DIR_LISTING, HELP_SEPARATOR, LS_SEPARATOR};
use crate::core::path;
use crate::models::{FileNode, FsNode, Output};

use super::{Builtin, CommandRegistry, CommandResult, ShellState};

/// Execute a built-in command.
///
/// Built-ins never touch the session: `cd` and `clear` return a
/// [`SessionEffect`](super::SessionEffect) for the caller to apply.
pub fn execute_builtin(
    builtin: Builtin,
    args: &[String],
    registry: &CommandRegistry,
    state: &ShellState<'_>,
) -> CommandResult {
    let target = args.first().map(String::as_str);

    match builtin {
        Builtin::Help => {
            let names: Vec<&str> = registry.names().collect();
            CommandResult::output(Output::text(names.join(HELP_SEPARATOR)))
        }
        Builtin::Ls => execute_ls(target.unwrap_or("."), state),
        Builtin::Cd => execute_cd(target, state),
        Builtin::Cat => match target {
            Some(file) => execute_cat(file, state),
            None => CommandResult::error("cat: missing file operand"),
        },
        Builtin::Echo => CommandResult::output(Output::text(args.join(" "))),
        Builtin::Pwd => CommandResult::output(Output::text(state.current_path)),
        Builtin::Clear => CommandResult::clear(),
    }
}

/// Execute `ls` command.
fn execute_ls(target: &str, state: &ShellState<'_>) -> CommandResult {
    let resolved = path::resolve(target, state.current_path);

    match state.fs.get_entry(&resolved) {
        Some(node @ FsNode::Directory(_)) => {
            let names = node.sorted_child_names();
            if names.is_empty() {
                CommandResult::output(Output::text(EMPTY_DIR_LISTING))
            } else {
                CommandResult::output(Output::text(names.join(LS_SEPARATOR)))
            }
        }
        Some(FsNode::File(_)) => CommandResult::output(Output::text(target)),
        None => CommandResult::error(format!(
            "ls: cannot access '{}': No such file or directory",
            target
        )),
    }
}

/// Execute `cd` command.
///
/// `cd -` swaps to the previous directory and echoes it; every other form
/// is silent on success. A bare `cd` goes to the root.
fn execute_cd(target: Option<&str>, state: &ShellState<'_>) -> CommandResult {
    if target == Some("-") {
        let Some(previous) = state.previous_path else {
            return CommandResult::error("cd: OLDPWD not set");
        };
        if !state.fs.is_directory(previous) {
            return CommandResult::error(format!(
                "cd: {}: No such file or directory",
                previous
            ));
        }
        return CommandResult::change_directory(previous, Some(Output::text(previous)));
    }

    let target = target.unwrap_or("/");
    let resolved = path::resolve(target, state.current_path);

    match state.fs.get_entry(&resolved) {
        Some(FsNode::Directory(_)) => CommandResult::change_directory(resolved, None),
        Some(FsNode::File(_)) => CommandResult::error(format!("cd: not a directory: {}", target)),
        None => CommandResult::error(format!("cd: {}: No such file or directory", target)),
    }
}

/// Execute `cat` command.
fn execute_cat(target: &str, state: &ShellState<'_>) -> CommandResult {
    let resolved = path::resolve(target, state.current_path);

    match state.fs.get_entry(&resolved) {
        None => CommandResult::error(format!("cat: {}: No such file", target)),
        Some(FsNode::Directory(_)) => {
            CommandResult::error(format!("cat: {}: Is a directory", target))
        }
        Some(FsNode::File(FileNode::Text(file))) => {
            CommandResult::output(Output::text(file.content.as_str()))
        }
        Some(FsNode::File(FileNode::Link(link))) => CommandResult::output(Output::link(link)),
    }
}

// =============================================================================
// Tests
// =============================================================================
