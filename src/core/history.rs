//! Command-line recall for up/down navigation.

use std::collections::VecDeque;

use crate::config::MAX_RECALL;

/// Arrow-key direction for history navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward older lines
    Up,
    /// Toward newer lines
    Down,
}

/// What the input buffer should show after a navigation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recall {
    /// Replace the input with a recalled line
    Line(String),
    /// Walked past the newest line: blank the input
    Blank,
}

/// Submitted lines, oldest first, plus the current recall position.
///
/// `index` is `None` while the user is editing a fresh line.
#[derive(Clone, Debug)]
pub struct RecallStack {
    lines: VecDeque<String>,
    index: Option<usize>,
    limit: usize,
    dedupe: bool,
}

impl RecallStack {
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(limit: usize, dedupe: bool) -> Self {
        assert!(limit > 0, "RecallStack limit must be greater than 0");
        Self {
            lines: VecDeque::new(),
            index: None,
            limit,
            dedupe,
        }
    }

    /// Record a submitted line and reset the recall position.
    ///
    /// Lines are trimmed; blank lines are never recorded.
    pub fn push(&mut self, line: &str) {
        self.index = None;

        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.dedupe && self.lines.back().is_some_and(|last| last == line) {
            return;
        }
        if self.lines.len() == self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    /// Forget the recall position without recording anything.
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Step through the stack.
    ///
    /// `Up` starts at the newest line and stops at the oldest. `Down` walks
    /// back toward the newest and, past it, leaves recall mode with
    /// [`Recall::Blank`]. Returns `None` when nothing changes.
    pub fn navigate(&mut self, direction: Direction) -> Option<Recall> {
        if self.lines.is_empty() {
            return None;
        }
        let last = self.lines.len() - 1;

        let new_index = match (direction, self.index) {
            (Direction::Up, None) => last,
            (Direction::Up, Some(i)) => i.saturating_sub(1),
            (Direction::Down, None) => return None,
            (Direction::Down, Some(i)) if i < last => i + 1,
            (Direction::Down, Some(_)) => {
                self.index = None;
                return Some(Recall::Blank);
            }
        };

        self.index = Some(new_index);
        self.lines.get(new_index).cloned().map(Recall::Line)
    }

    /// Current recall position, if navigating.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recorded lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl Default for RecallStack {
    fn default() -> Self {
        Self::new(MAX_RECALL, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(lines: &[&str]) -> RecallStack {
        let mut stack = RecallStack::default();
        for line in lines {
            stack.push(line);
        }
        stack
    }

    fn line(s: &str) -> Option<Recall> {
        Some(Recall::Line(s.to_string()))
    }

    #[test]
    fn test_push_trims_and_skips_blank() {
        let stack = stack(&["  ls  ", "", "   ", "pwd"]);
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec!["ls", "pwd"]);
    }

    #[test]
    fn test_navigate_empty() {
        let mut stack = RecallStack::default();
        assert_eq!(stack.navigate(Direction::Up), None);
        assert_eq!(stack.navigate(Direction::Down), None);
    }

    #[test]
    fn test_up_walks_to_oldest_and_stops() {
        let mut stack = stack(&["one", "two", "three"]);
        assert_eq!(stack.navigate(Direction::Up), line("three"));
        assert_eq!(stack.navigate(Direction::Up), line("two"));
        assert_eq!(stack.navigate(Direction::Up), line("one"));
        assert_eq!(stack.navigate(Direction::Up), line("one"));
        assert_eq!(stack.index(), Some(0));
    }

    #[test]
    fn test_down_past_newest_blanks() {
        let mut stack = stack(&["one", "two"]);
        stack.navigate(Direction::Up);
        stack.navigate(Direction::Up);
        assert_eq!(stack.navigate(Direction::Down), line("two"));
        assert_eq!(stack.navigate(Direction::Down), Some(Recall::Blank));
        assert_eq!(stack.index(), None);
        // Without an active position, Down is a no-op
        assert_eq!(stack.navigate(Direction::Down), None);
    }

    #[test]
    fn test_push_resets_index() {
        let mut stack = stack(&["one", "two"]);
        stack.navigate(Direction::Up);
        stack.navigate(Direction::Up);
        stack.push("three");
        assert_eq!(stack.index(), None);
        assert_eq!(stack.navigate(Direction::Up), line("three"));
    }

    #[test]
    fn test_reset() {
        let mut stack = stack(&["one"]);
        stack.navigate(Direction::Up);
        stack.reset();
        assert_eq!(stack.index(), None);
    }

    #[test]
    fn test_duplicates_kept_by_default() {
        let stack = stack(&["ls", "ls"]);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_dedupe_consecutive() {
        let mut stack = RecallStack::new(10, true);
        stack.push("ls");
        stack.push("ls");
        stack.push("pwd");
        stack.push("ls");
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec!["ls", "pwd", "ls"]);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut stack = RecallStack::new(2, false);
        stack.push("one");
        stack.push("two");
        stack.push("three");
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec!["two", "three"]);
    }
}
