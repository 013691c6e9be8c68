//! Session orchestration.
//!
//! A [`Session`] owns everything mutable about one terminal: the current and
//! previous directory, the scrollback, the live input buffer, the completion
//! state and the recall stack. The filesystem is shared and never mutated.
//!
//! Every operation runs to completion synchronously. A session is `Send` and
//! `Sync`, but it is not designed for concurrent mutation: callers sharing one
//! across threads should wrap it in a `Mutex`.

use std::mem;

use crate::config::{PROMPT_SIGIL, SessionConfig};
use crate::core::{
    CommandRegistry, Completer, CompletionState, Direction, Recall, RecallStack, SessionEffect,
    ShellState, VirtualFs, execute_line, path,
};
use crate::models::{FsNode, HistoryEntry, Scrollback};

// ============================================================================
// Session
// ============================================================================

/// One interactive shell session over a virtual filesystem.
#[derive(Clone, Debug)]
pub struct Session {
    fs: VirtualFs,
    registry: CommandRegistry,
    /// Always absolute and normalized
    current_path: String,
    /// Directory active before the last successful `cd`
    previous_path: Option<String>,
    scrollback: Scrollback,
    input: String,
    completion: CompletionState,
    recall: RecallStack,
}

impl Session {
    /// Create a session with the built-in commands and default limits.
    pub fn new(fs: impl Into<VirtualFs>, start_path: &str) -> Self {
        Self::builder(fs).start_path(start_path).build()
    }

    pub fn builder(fs: impl Into<VirtualFs>) -> SessionBuilder {
        SessionBuilder {
            fs: fs.into(),
            start_path: "/".to_string(),
            registry: CommandRegistry::new(),
            config: SessionConfig::default(),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Run the input buffer as a command line.
    ///
    /// The trimmed line is pushed onto the recall stack and executed. Its
    /// entry is appended to the scrollback, except for a built-in `clear`,
    /// which empties the scrollback instead. Input, recall position and
    /// completion state are reset either way.
    ///
    /// Returns the entry for the executed line.
    pub fn submit(&mut self) -> HistoryEntry {
        let line = mem::take(&mut self.input).trim().to_string();
        self.recall.push(&line);

        let result = execute_line(&line, &self.registry, &self.shell_state());
        let entry = HistoryEntry::new(self.current_path.clone(), line, result.output);

        match result.effect {
            Some(SessionEffect::ClearScrollback) => self.scrollback.clear(),
            Some(SessionEffect::ChangeDirectory(target)) => {
                self.change_directory(target);
                self.scrollback.push(entry.clone());
            }
            None => self.scrollback.push(entry.clone()),
        }

        self.completion = CompletionState::Idle;
        entry
    }

    /// Abort the half-typed line, echoing it with no output (like Ctrl-C).
    ///
    /// The line is not pushed onto the recall stack.
    pub fn interrupt(&mut self) {
        let input = mem::take(&mut self.input);
        self.scrollback
            .push(HistoryEntry::new(self.current_path.clone(), input, None));
        self.recall.reset();
        self.completion = CompletionState::Idle;
    }

    /// Handle a Tab press. Returns `true` if the input buffer changed.
    pub fn complete(&mut self) -> bool {
        let state = mem::take(&mut self.completion);
        let completion = Completer::new(&self.registry, &self.fs, &self.current_path)
            .complete(&self.input, state);

        let changed = completion.buffer != self.input;
        self.input = completion.buffer;
        self.completion = completion.state;
        changed
    }

    /// Recall an older (`Up`) or newer (`Down`) line into the input buffer.
    pub fn navigate_history(&mut self, direction: Direction) {
        match self.recall.navigate(direction) {
            Some(Recall::Line(line)) => self.set_input(line),
            Some(Recall::Blank) => self.set_input(String::new()),
            None => {}
        }
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Replace the input buffer.
    ///
    /// A pending completion survives only if the new input equals its seed.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        if !self.completion.is_valid_for(&self.input) {
            self.completion = CompletionState::Idle;
        }
    }

    /// Move to `path` without recording it for `cd -`.
    ///
    /// The path is normalized but not checked; [`current_dir`](Self::current_dir)
    /// returns `None` while it does not resolve to a node.
    pub fn set_path(&mut self, path: &str) {
        self.current_path = path::normalize(path);
        self.completion = CompletionState::Idle;
    }

    // ========================================================================
    // Read State
    // ========================================================================

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// The node at the current path, if it still resolves.
    pub fn current_dir(&self) -> Option<&FsNode> {
        self.fs.get_entry(&self.current_path)
    }

    pub fn previous_path(&self) -> Option<&str> {
        self.previous_path.as_deref()
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    pub fn recall(&self) -> &RecallStack {
        &self.recall
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    /// Prompt text for the live input line, e.g. `/docs $`.
    pub fn prompt(&self) -> String {
        format!("{} {}", self.current_path, PROMPT_SIGIL)
    }

    /// Ghost text a Tab press would add to the current input.
    pub fn hint(&self) -> Option<String> {
        Completer::new(&self.registry, &self.fs, &self.current_path).hint(&self.input)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn shell_state(&self) -> ShellState<'_> {
        ShellState {
            fs: &self.fs,
            current_path: &self.current_path,
            previous_path: self.previous_path.as_deref(),
        }
    }

    fn change_directory(&mut self, target: String) {
        tracing::debug!(from = %self.current_path, to = %target, "changing directory");
        let previous = mem::replace(&mut self.current_path, target);
        self.previous_path = Some(previous);
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Configures a [`Session`] before it starts.
#[derive(Debug)]
pub struct SessionBuilder {
    fs: VirtualFs,
    start_path: String,
    registry: CommandRegistry,
    config: SessionConfig,
}

impl SessionBuilder {
    /// Initial working directory (default `/`).
    pub fn start_path(mut self, path: &str) -> Self {
        self.start_path = path.to_string();
        self
    }

    /// Commands to use instead of the plain built-ins.
    pub fn registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// # Panics
    ///
    /// Panics if a configured limit is zero. Configs parsed with
    /// [`SessionConfig::from_toml_str`] are already validated.
    pub fn build(self) -> Session {
        let current_path = path::normalize(&self.start_path);
        if !self.fs.is_directory(&current_path) {
            tracing::warn!(path = %current_path, "start path is not a directory");
        }

        Session {
            fs: self.fs,
            registry: self.registry,
            current_path,
            previous_path: None,
            scrollback: Scrollback::new(self.config.scrollback_limit),
            input: String::new(),
            completion: CompletionState::Idle,
            recall: RecallStack::new(self.config.recall_limit, self.config.dedupe_recall),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CustomCommand;
    use crate::core::error::CommandError;
    use crate::models::Output;

    fn create_test_fs() -> VirtualFs {
        VirtualFs::new(FsNode::dir([
            (
                "docs",
                FsNode::dir([
                    ("a.txt", FsNode::text("hi")),
                    ("b.txt", FsNode::text("yo")),
                ]),
            ),
            ("downloads", FsNode::empty_dir()),
        ]))
    }

    fn run(session: &mut Session, line: &str) -> HistoryEntry {
        session.set_input(line);
        session.submit()
    }

    #[test]
    fn test_new_session() {
        let session = Session::new(create_test_fs(), "/docs/../docs/");
        assert_eq!(session.current_path(), "/docs");
        assert!(session.current_dir().is_some_and(FsNode::is_directory));
        assert!(session.scrollback().is_empty());
        assert_eq!(session.input(), "");
        assert!(session.completion().is_idle());
        assert_eq!(session.previous_path(), None);
        assert_eq!(session.prompt(), "/docs $");
    }

    #[test]
    fn test_submit_appends_entry() {
        let mut session = Session::new(create_test_fs(), "/");
        let entry = run(&mut session, "  ls docs  ");

        assert_eq!(entry.input, "ls docs");
        assert_eq!(entry.path, "/");
        assert_eq!(entry.output_text(), Some("a.txt  b.txt"));
        assert_eq!(session.scrollback().last(), Some(&entry));
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_submit_empty_line() {
        let mut session = Session::new(create_test_fs(), "/");
        let entry = run(&mut session, "   ");

        assert_eq!(entry.input, "");
        assert_eq!(entry.output, None);
        assert!(session.recall().is_empty());
        assert_eq!(session.scrollback().len(), 1);
    }

    #[test]
    fn test_cd_updates_path_and_previous() {
        let mut session = Session::new(create_test_fs(), "/");
        let entry = run(&mut session, "cd docs");

        assert_eq!(entry.output, None);
        assert_eq!(entry.path, "/");
        assert_eq!(session.current_path(), "/docs");
        assert_eq!(session.previous_path(), Some("/"));
        assert_eq!(run(&mut session, "pwd").output, Some(Output::text("/docs")));
    }

    #[test]
    fn test_failed_cd_keeps_state() {
        let mut session = Session::new(create_test_fs(), "/docs");
        run(&mut session, "cd nowhere");
        run(&mut session, "cd a.txt");

        assert_eq!(session.current_path(), "/docs");
        assert_eq!(session.previous_path(), None);
    }

    #[test]
    fn test_cd_dash_round_trip() {
        let mut session = Session::new(create_test_fs(), "/");
        assert_eq!(
            run(&mut session, "cd -").output,
            Some(Output::error("cd: OLDPWD not set"))
        );

        run(&mut session, "cd docs");
        let entry = run(&mut session, "cd -");
        assert_eq!(entry.output, Some(Output::text("/")));
        assert_eq!(session.current_path(), "/");
        assert_eq!(session.previous_path(), Some("/docs"));

        run(&mut session, "cd -");
        assert_eq!(session.current_path(), "/docs");
    }

    #[test]
    fn test_clear_empties_scrollback_but_is_recalled() {
        let mut session = Session::new(create_test_fs(), "/");
        run(&mut session, "pwd");
        run(&mut session, "clear");

        assert!(session.scrollback().is_empty());
        session.navigate_history(Direction::Up);
        assert_eq!(session.input(), "clear");
    }

    #[test]
    fn test_interrupt() {
        let mut session = Session::new(create_test_fs(), "/docs");
        session.set_input("cat half-typ");
        session.interrupt();

        let entry = session.scrollback().last().unwrap();
        assert_eq!(entry.input, "cat half-typ");
        assert_eq!(entry.output, None);
        assert_eq!(entry.path, "/docs");
        assert_eq!(session.input(), "");
        assert!(session.recall().is_empty());
    }

    #[test]
    fn test_history_navigation() {
        let mut session = Session::new(create_test_fs(), "/");
        run(&mut session, "pwd");
        run(&mut session, "ls");

        session.navigate_history(Direction::Up);
        assert_eq!(session.input(), "ls");
        session.navigate_history(Direction::Up);
        assert_eq!(session.input(), "pwd");
        session.navigate_history(Direction::Up);
        assert_eq!(session.input(), "pwd");
        session.navigate_history(Direction::Down);
        assert_eq!(session.input(), "ls");
        session.navigate_history(Direction::Down);
        assert_eq!(session.input(), "");
        assert_eq!(session.recall().index(), None);
    }

    #[test]
    fn test_interrupt_resets_recall_index() {
        let mut session = Session::new(create_test_fs(), "/");
        run(&mut session, "pwd");
        run(&mut session, "ls");
        session.navigate_history(Direction::Up);
        session.navigate_history(Direction::Up);
        session.interrupt();

        session.navigate_history(Direction::Up);
        assert_eq!(session.input(), "ls");
    }

    #[test]
    fn test_complete_and_cycle() {
        let mut session = Session::new(create_test_fs(), "/");
        session.set_input("cd d");

        assert!(session.complete());
        assert_eq!(session.input(), "cd do");
        assert_eq!(session.completion().cycle().and_then(|c| c.index()), None);

        session.complete();
        assert_eq!(session.input(), "cd docs");
        session.complete();
        assert_eq!(session.input(), "cd downloads");
        session.complete();
        assert_eq!(session.input(), "cd docs");
    }

    #[test]
    fn test_edit_discards_completion() {
        let mut session = Session::new(create_test_fs(), "/");
        session.set_input("c");
        session.complete();
        assert!(!session.completion().is_idle());

        // Setting the same text keeps the cycle
        session.set_input("c");
        assert!(!session.completion().is_idle());

        session.set_input("ca");
        assert!(session.completion().is_idle());
    }

    #[test]
    fn test_history_navigation_discards_completion() {
        let mut session = Session::new(create_test_fs(), "/");
        run(&mut session, "pwd");
        session.set_input("c");
        session.complete();
        session.navigate_history(Direction::Up);
        assert!(session.completion().is_idle());
    }

    #[test]
    fn test_submit_resets_completion() {
        let mut session = Session::new(create_test_fs(), "/");
        session.set_input("c");
        session.complete();
        session.submit();
        assert!(session.completion().is_idle());
    }

    #[test]
    fn test_set_path() {
        let mut session = Session::new(create_test_fs(), "/");
        session.set_path("docs/./");
        assert_eq!(session.current_path(), "/docs");
        assert_eq!(session.previous_path(), None);

        session.set_path("/gone");
        assert!(session.current_dir().is_none());
        assert_eq!(
            run(&mut session, "ls").output,
            Some(Output::error("ls: cannot access '.': No such file or directory"))
        );
    }

    #[test]
    fn test_custom_handler_failure_keeps_session() {
        let registry = CommandRegistry::new()
            .with(
                "boom",
                CustomCommand::new(|_, _| Err(CommandError::new("nope"))),
            )
            .unwrap();
        let mut session = Session::builder(create_test_fs()).registry(registry).build();

        let entry = run(&mut session, "boom");
        assert_eq!(entry.output, Some(Output::error("error: executing boom")));
        assert_eq!(run(&mut session, "pwd").output, Some(Output::text("/")));
    }

    #[test]
    fn test_config_limits() {
        let config = SessionConfig {
            scrollback_limit: 2,
            recall_limit: 1,
            dedupe_recall: false,
        };
        let mut session = Session::builder(create_test_fs()).config(config).build();
        run(&mut session, "echo 1");
        run(&mut session, "echo 2");
        run(&mut session, "echo 3");

        assert_eq!(session.scrollback().len(), 2);
        assert_eq!(session.recall().iter().collect::<Vec<_>>(), vec!["echo 3"]);
    }

    #[test]
    fn test_hint() {
        let mut session = Session::new(create_test_fs(), "/");
        session.set_input("pw");
        assert_eq!(session.hint(), Some("d".to_string()));
        // Hints never touch the completion state
        assert!(session.completion().is_idle());
    }
}
