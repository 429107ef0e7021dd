//! Directory tree snapshots.
//!
//! A snapshot is rebuilt from disk on every request. Directories become
//! nested maps and files become their size in bytes, so the JSON form is
//! `{"<root name>": {"a.mp4": 1234, "b": {"c.mkv": 10}}}`.

use reelshelf_common::paths::ExtensionFilter;
use reelshelf_common::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Children of a directory, iterated in byte-wise name order.
pub type DirEntries = BTreeMap<String, TreeNode>;

/// One entry in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// A file and its size in bytes.
    File(u64),
    /// A directory and its readable children.
    Dir(DirEntries),
}

impl TreeNode {
    /// Children, if this is a directory.
    pub fn as_dir(&self) -> Option<&DirEntries> {
        match self {
            TreeNode::Dir(children) => Some(children),
            TreeNode::File(_) => None,
        }
    }

    /// Size in bytes, if this is a file.
    pub fn size(&self) -> Option<u64> {
        match self {
            TreeNode::File(size) => Some(*size),
            TreeNode::Dir(_) => None,
        }
    }
}

/// A point-in-time view of the media root.
///
/// Serializes as a single-key object mapping the root's base name to its
/// children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub name: String,
    pub children: DirEntries,
}

impl Serialize for TreeSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.children)?;
        map.end()
    }
}

/// Walks a directory into a [`TreeSnapshot`].
///
/// Entries that cannot be stat'ed or read are skipped; only failure to read
/// the root itself is reported. Names that are not valid UTF-8 are skipped
/// too, since they cannot be keys of the JSON snapshot. Symlinks are followed.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    filter: Option<ExtensionFilter>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit files whose extension the filter disables.
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Snapshot the directory at `root`, named after its base name.
    pub fn build(&self, root: &Path) -> Result<TreeSnapshot> {
        let metadata = fs::metadata(root)?;
        if !metadata.is_dir() {
            return Err(io::Error::other("media root is not a directory").into());
        }

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let children = self.build_dir(root)?;

        tracing::debug!(entries = children.len(), "Built tree snapshot");
        Ok(TreeSnapshot { name, children })
    }

    fn build_dir(&self, dir: &Path) -> io::Result<DirEntries> {
        // Sort up front so the walk itself is reproducible, not just the output.
        let mut names: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name())
            .collect();
        names.sort();

        let mut node = DirEntries::new();
        for name in names {
            let full = dir.join(&name);
            let Ok(key) = name.into_string() else {
                tracing::trace!(path = ?full, "Skipping non UTF-8 name");
                continue;
            };
            let metadata = match fs::metadata(&full) {
                Ok(m) => m,
                Err(e) => {
                    tracing::trace!(path = ?full, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                match self.build_dir(&full) {
                    Ok(child) => {
                        node.insert(key, TreeNode::Dir(child));
                    }
                    Err(e) => {
                        tracing::trace!(path = ?full, error = %e, "Skipping unreadable directory");
                    }
                }
            } else {
                if let Some(filter) = &self.filter {
                    if filter.is_disabled(&full) {
                        continue;
                    }
                }
                node.insert(key, TreeNode::File(metadata.len()));
            }
        }

        Ok(node)
    }
}
