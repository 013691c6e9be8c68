use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LINK_TARGET;

// =============================================================================
// File Types
// =============================================================================

/// A plain text file. `cat` prints the content verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TextFile {
    pub content: String,
}

/// A file that renders as a hyperlink instead of text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkFile {
    /// Link destination
    pub href: String,
    /// Display label (falls back to `href`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Browsing context to open the link in (falls back to `_blank`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl LinkFile {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: None,
            target: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Label to display, defaulting to the href.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.href)
    }

    /// Open target, defaulting to a new browsing context.
    pub fn open_target(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_LINK_TARGET)
    }
}

/// The two kinds of file the virtual filesystem can hold.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FileNode {
    Text(TextFile),
    Link(LinkFile),
}

// =============================================================================
// Filesystem Node
// =============================================================================

/// Represents an entry in the virtual filesystem.
///
/// The serialized shape doubles as the tree's file format: a JSON object is a
/// directory keyed by child name, `{"content": ...}` is a text file and
/// `{"href": ..., "label"?: ..., "target"?: ...}` is a link file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FsNode {
    File(FileNode),
    Directory(HashMap<String, FsNode>),
}

impl FsNode {
    /// Create a directory from `(name, node)` pairs.
    pub fn dir<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, FsNode)>,
        S: Into<String>,
    {
        FsNode::Directory(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    /// Create an empty directory.
    pub fn empty_dir() -> Self {
        FsNode::Directory(HashMap::new())
    }

    /// Create a text file.
    pub fn text(content: impl Into<String>) -> Self {
        FsNode::File(FileNode::Text(TextFile {
            content: content.into(),
        }))
    }

    /// Create a link file with default label and target.
    pub fn link(href: impl Into<String>) -> Self {
        FsNode::File(FileNode::Link(LinkFile::new(href)))
    }

    /// Wrap a fully specified link file.
    pub fn link_file(link: LinkFile) -> Self {
        FsNode::File(FileNode::Link(link))
    }

    /// Check if this node is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, FsNode::Directory(_))
    }

    /// Get the children map (directories only).
    pub fn children(&self) -> Option<&HashMap<String, FsNode>> {
        match self {
            FsNode::Directory(children) => Some(children),
            FsNode::File(_) => None,
        }
    }

    /// Get the file payload (files only).
    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            FsNode::File(file) => Some(file),
            FsNode::Directory(_) => None,
        }
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FsNode> {
        self.children()?.get(name)
    }

    /// Child names in lexicographic order (empty for files).
    pub fn sorted_child_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .children()
            .map(|c| c.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}
