use std::sync::Arc;

use crate::core::error::TreeError;
use crate::core::path;
use crate::models::FsNode;

/// Walk `tree` along the segments of an absolute path.
///
/// Fails as soon as a segment names a missing entry or passes through a
/// file. A path with no segments (`/`) is the root itself.
pub fn lookup<'a>(tree: &'a FsNode, path: &str) -> Option<&'a FsNode> {
    let mut current = tree;
    for part in path::segments(path) {
        current = current.children()?.get(part)?;
    }
    Some(current)
}

/// Read-only virtual filesystem shared between a session and its caller.
///
/// # Path Convention
///
/// - Root: `"/"`
/// - File in root: `"/notes.txt"`
/// - Nested file: `"/docs/a.txt"`
///
/// Every method takes an absolute, normalized path (see [`path::resolve`]).
#[derive(Clone, Debug)]
pub struct VirtualFs {
    root: Arc<FsNode>,
}

impl VirtualFs {
    /// Wrap a tree. The caller may keep its own `Arc` to the same tree.
    pub fn new(root: impl Into<Arc<FsNode>>) -> Self {
        Self { root: root.into() }
    }

    /// Parse a tree from its JSON shape.
    ///
    /// The root must be a directory.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let root: FsNode = serde_json::from_str(json)?;
        if !root.is_directory() {
            return Err(TreeError::RootNotDirectory);
        }
        Ok(Self::new(root))
    }

    /// Create a filesystem with an empty root directory.
    pub fn empty() -> Self {
        Self::new(FsNode::empty_dir())
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Shared handle to the root node.
    pub fn shared_root(&self) -> Arc<FsNode> {
        Arc::clone(&self.root)
    }

    /// Get an entry by absolute path.
    pub fn get_entry(&self, path: &str) -> Option<&FsNode> {
        lookup(&self.root, path)
    }

    /// Check if a path is a directory.
    pub fn is_directory(&self, path: &str) -> bool {
        self.get_entry(path).is_some_and(FsNode::is_directory)
    }

    /// List directory child names in lexicographic order.
    ///
    /// Returns `None` if the path is missing or is a file.
    pub fn list_dir(&self, path: &str) -> Option<Vec<&str>> {
        let node = self.get_entry(path)?;
        node.is_directory().then(|| node.sorted_child_names())
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<FsNode> for VirtualFs {
    fn from(root: FsNode) -> Self {
        Self::new(root)
    }
}

impl From<Arc<FsNode>> for VirtualFs {
    fn from(root: Arc<FsNode>) -> Self {
        Self::new(root)
    }
}
