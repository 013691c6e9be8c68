//! Tab completion for command names and paths.
//!
//! Completion is a small state machine driven by repeated Tab presses:
//!
//! - `Idle`: nothing pending. Tab looks up completions from scratch.
//! - `CommandCycle` / `PathCycle`: the last Tab found several matches. While
//!   the input still equals the cycle's seed, each Tab rotates to the next
//!   match. Any other input discards the cycle.
//!
//! A fresh lookup behaves like a familiar shell:
//! - Single match: replace the token, back to `Idle`
//! - Multiple matches: extend the token to the longest common prefix and
//!   start a cycle that has not picked a match yet
//! - No match: leave the input alone

use crate::core::commands::{CommandRegistry, CompletionPolicy, FileScope};
use crate::core::{VirtualFs, path};

// ============================================================================
// Public Types
// ============================================================================

/// Ambiguous matches being rotated through by repeated Tab presses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle {
    options: Vec<String>,
    /// `None` until the first rotation; the next Tab then picks option 0
    index: Option<usize>,
    /// The exact input this cycle is valid for
    seed: String,
}

impl Cycle {
    fn new(options: Vec<String>, seed: String) -> Self {
        Self {
            options,
            index: None,
            seed,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The option most recently rotated in.
    pub fn current(&self) -> Option<&str> {
        self.options.get(self.index?).map(String::as_str)
    }

    fn can_advance(&self, input: &str) -> bool {
        self.seed == input && self.options.len() > 1
    }

    fn advance(&mut self) -> &str {
        let next = self.index.map_or(0, |i| (i + 1) % self.options.len());
        self.index = Some(next);
        &self.options[next]
    }
}

/// Pending completion between Tab presses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CompletionState {
    #[default]
    Idle,
    /// Rotating the first token through command names
    CommandCycle(Cycle),
    /// Rotating the last token through entries of one directory
    PathCycle {
        cycle: Cycle,
        /// Typed directory part, up to and including the last `/`
        dir_prefix: String,
    },
}

impl CompletionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn cycle(&self) -> Option<&Cycle> {
        match self {
            Self::Idle => None,
            Self::CommandCycle(cycle) | Self::PathCycle { cycle, .. } => Some(cycle),
        }
    }

    /// Check if this state may still be used for the given input.
    pub fn is_valid_for(&self, input: &str) -> bool {
        self.cycle().is_some_and(|cycle| cycle.seed == input)
    }
}

/// New input buffer and state after a Tab press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub buffer: String,
    pub state: CompletionState,
}

/// Result of a fresh autocomplete lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single match - the completed input.
    Single(String),
    /// Multiple matches - input extended to the common prefix, plus all options.
    Multiple {
        buffer: String,
        options: Vec<String>,
        /// `Some` for path completion, holding the typed directory part
        dir_prefix: Option<String>,
    },
    /// No matches found.
    None,
}

// ============================================================================
// Completer
// ============================================================================

/// Everything a completion needs to read from the session.
#[derive(Clone, Copy, Debug)]
pub struct Completer<'a> {
    registry: &'a CommandRegistry,
    fs: &'a VirtualFs,
    current_path: &'a str,
}

impl<'a> Completer<'a> {
    pub fn new(registry: &'a CommandRegistry, fs: &'a VirtualFs, current_path: &'a str) -> Self {
        Self {
            registry,
            fs,
            current_path,
        }
    }

    /// Handle one Tab press.
    ///
    /// Rotates an existing cycle when it is still valid for `input`,
    /// otherwise discards it and looks up completions from scratch.
    pub fn complete(&self, input: &str, state: CompletionState) -> Completion {
        match state {
            CompletionState::CommandCycle(mut cycle) if cycle.can_advance(input) => {
                let buffer = replace_first_token(input, cycle.advance());
                tracing::trace!(index = ?cycle.index, buffer = %buffer, "command cycle advanced");
                cycle.seed.clone_from(&buffer);
                return Completion {
                    buffer,
                    state: CompletionState::CommandCycle(cycle),
                };
            }
            CompletionState::PathCycle {
                mut cycle,
                dir_prefix,
            } if cycle.can_advance(input) => {
                let replacement = format!("{}{}", dir_prefix, cycle.advance());
                let buffer = replace_last_token(input, &replacement);
                tracing::trace!(index = ?cycle.index, buffer = %buffer, "path cycle advanced");
                cycle.seed.clone_from(&buffer);
                return Completion {
                    buffer,
                    state: CompletionState::PathCycle { cycle, dir_prefix },
                };
            }
            _ => {}
        }

        match self.autocomplete(input) {
            AutocompleteResult::None => Completion {
                buffer: input.to_string(),
                state: CompletionState::Idle,
            },
            AutocompleteResult::Single(buffer) => Completion {
                buffer,
                state: CompletionState::Idle,
            },
            AutocompleteResult::Multiple {
                buffer,
                options,
                dir_prefix,
            } => {
                tracing::trace!(matches = options.len(), buffer = %buffer, "completion cycle started");
                let cycle = Cycle::new(options, buffer.clone());
                let state = match dir_prefix {
                    None => CompletionState::CommandCycle(cycle),
                    Some(dir_prefix) => CompletionState::PathCycle { cycle, dir_prefix },
                };
                Completion { buffer, state }
            }
        }
    }

    /// Look up completions for `input` from scratch.
    pub fn autocomplete(&self, input: &str) -> AutocompleteResult {
        let trimmed = input.trim_start();
        let Some(name) = trimmed.split_whitespace().next() else {
            return AutocompleteResult::None;
        };

        let ends_with_space = input.ends_with(char::is_whitespace);
        if !ends_with_space && trimmed.split_whitespace().count() == 1 {
            return self.complete_command(input, name);
        }

        match self.registry.completion(name) {
            Some(CompletionPolicy::Paths(scope)) => self.complete_path(input, ends_with_space, scope),
            // Unknown commands and commands without a policy
            Some(CompletionPolicy::None) | None => AutocompleteResult::None,
        }
    }

    /// Get the text a Tab press would append, for ghost text while typing.
    pub fn hint(&self, input: &str) -> Option<String> {
        let buffer = match self.autocomplete(input) {
            AutocompleteResult::Single(buffer) | AutocompleteResult::Multiple { buffer, .. } => {
                buffer
            }
            AutocompleteResult::None => return None,
        };
        buffer
            .strip_prefix(input)
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string)
    }

    // ========================================================================
    // Command Completion
    // ========================================================================

    fn complete_command(&self, input: &str, partial: &str) -> AutocompleteResult {
        let mut matches: Vec<&str> = self
            .registry
            .names()
            .filter(|name| name.starts_with(partial))
            .collect();
        matches.sort_unstable();

        match matches.as_slice() {
            [] => AutocompleteResult::None,
            [only] => AutocompleteResult::Single(replace_first_token(input, only)),
            _ => {
                let common = longest_common_prefix(&matches);
                let buffer = if common.len() > partial.len() {
                    replace_first_token(input, &common)
                } else {
                    input.to_string()
                };
                AutocompleteResult::Multiple {
                    buffer,
                    options: matches.into_iter().map(str::to_string).collect(),
                    dir_prefix: None,
                }
            }
        }
    }

    // ========================================================================
    // Path Completion
    // ========================================================================

    fn complete_path(&self, input: &str, ends_with_space: bool, scope: FileScope) -> AutocompleteResult {
        let partial = if ends_with_space {
            ""
        } else {
            input.split_whitespace().last().unwrap_or_default()
        };

        let (dir_prefix, name_part) = match partial.rfind('/') {
            Some(idx) => partial.split_at(idx + 1),
            None => ("", partial),
        };

        let search_dir = path::resolve(dir_prefix, self.current_path);
        let Some(children) = self.fs.get_entry(&search_dir).and_then(|dir| dir.children()) else {
            return AutocompleteResult::None;
        };

        let mut matches: Vec<&str> = children
            .iter()
            .filter(|(name, node)| name.starts_with(name_part) && scope.matches(node))
            .map(|(name, _)| name.as_str())
            .collect();
        matches.sort_unstable();

        match matches.as_slice() {
            [] => AutocompleteResult::None,
            [only] => AutocompleteResult::Single(replace_last_token(
                input,
                &format!("{}{}", dir_prefix, only),
            )),
            _ => {
                let common = longest_common_prefix(&matches);
                let buffer = if common.len() > name_part.len() {
                    replace_last_token(input, &format!("{}{}", dir_prefix, common))
                } else {
                    input.to_string()
                };
                AutocompleteResult::Multiple {
                    buffer,
                    options: matches.into_iter().map(str::to_string).collect(),
                    dir_prefix: Some(dir_prefix.to_string()),
                }
            }
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Find the longest prefix shared by every string.
pub fn longest_common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut prefix_len = first.len();

    for s in rest {
        prefix_len = first
            .char_indices()
            .zip(s.as_ref().chars())
            .take_while(|((i, a), b)| *i < prefix_len && a == b)
            .last()
            .map_or(0, |((i, a), _)| i + a.len_utf8());
        if prefix_len == 0 {
            break;
        }
    }

    first[..prefix_len].to_string()
}

/// Replace the first whitespace-delimited token, keeping everything around it.
fn replace_first_token(input: &str, replacement: &str) -> String {
    let start = input.len() - input.trim_start().len();
    let rest = &input[start..];
    let end = start + rest.find(char::is_whitespace).unwrap_or(rest.len());
    format!("{}{}{}", &input[..start], replacement, &input[end..])
}

/// Replace the trailing token; appends when the input ends in whitespace.
fn replace_last_token(input: &str, replacement: &str) -> String {
    let head = input.trim_end_matches(|c: char| !c.is_whitespace());
    format!("{}{}", head, replacement)
}

// ============================================================================
// Tests
// ============================================================================
