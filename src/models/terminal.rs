//! Terminal-related data types for output rendering.

use std::collections::VecDeque;
use std::fmt;

use crate::models::LinkFile;

/// Renderable result of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    /// Plain text output
    Text(String),
    /// Error message (rendered in the error style)
    Error(String),
    /// Hyperlink produced by `cat` on a link file
    Link {
        href: String,
        label: String,
        target: String,
    },
}

impl Output {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    /// Build a hyperlink from a link file, filling in the label and target defaults.
    pub fn link(file: &LinkFile) -> Self {
        Self::Link {
            href: file.href.clone(),
            label: file.display_label().to_string(),
            target: file.open_target().to_string(),
        }
    }

    /// Check if this is an error message.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Text content for text and error outputs.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Error(s) => Some(s),
            Self::Link { .. } => None,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Error(s) => write!(f, "{}", s),
            Self::Link { href, label, .. } if label == href => write!(f, "{}", href),
            Self::Link { href, label, .. } => write!(f, "{} <{}>", label, href),
        }
    }
}

/// One command/output pair in the scrollback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Working directory when the line was entered (for prompt rendering)
    pub path: String,
    /// The line as entered
    pub input: String,
    /// Absent for commands with no visible result
    pub output: Option<Output>,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>, input: impl Into<String>, output: Option<Output>) -> Self {
        Self {
            path: path.into(),
            input: input.into(),
            output,
        }
    }

    /// Output text, if the entry carries text or an error.
    pub fn output_text(&self) -> Option<&str> {
        self.output.as_ref().and_then(Output::as_text)
    }
}

// =============================================================================
// Scrollback
// =============================================================================

/// Bounded list of past entries, oldest first.
///
/// Once `limit` entries are held, each push evicts the oldest one.
#[derive(Clone, Debug)]
pub struct Scrollback {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Scrollback {
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "Scrollback limit must be greater than 0");
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Scrollback {
    type Item = &'a HistoryEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
