//! Confinement of client-supplied paths to the media root.
//!
//! Every filesystem operation the server performs on behalf of a client goes
//! through [`MediaRoot::resolve`] (or [`MediaRoot::confine`] for paths built
//! server-side). Resolution is purely lexical: `.` and `..` are folded after
//! joining onto the root, and the result is accepted only if the root is a
//! component-wise prefix of it. Nothing is read from disk, so a resolved path
//! may not exist.

use reelshelf_common::paths::to_slash;
use reelshelf_common::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// The directory all client paths are confined to.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRoot {
    path: PathBuf,
}

impl MediaRoot {
    /// Make `path` absolute against the current directory and fold `.`/`..`.
    ///
    /// Symlinks are not resolved.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let absolute = std::path::absolute(path.as_ref())?;
        Ok(Self {
            path: lexical_clean(&absolute),
        })
    }

    /// Absolute path of the root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name used as the top-level key of tree snapshots.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Resolve a client-supplied relative path inside the root.
    ///
    /// Backslashes are treated as separators and leading slashes are ignored,
    /// so `"/a/b"`, `"a\\b"` and `"a/b"` all name the same entry. Any result
    /// outside the root fails with [`Error::Confinement`].
    pub fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let normalized = rel.replace('\\', "/");
        let normalized = normalized.trim_start_matches('/');

        if normalized.contains('\0') {
            return Err(Error::Confinement);
        }

        let mut joined = self.path.clone();
        for segment in normalized.split('/') {
            joined.push(segment);
        }

        self.confine(&joined)
    }

    /// Fold `candidate` lexically and check it is the root or below it.
    pub fn confine(&self, candidate: &Path) -> Result<PathBuf> {
        let cleaned = lexical_clean(candidate);
        if cleaned.starts_with(&self.path) {
            Ok(cleaned)
        } else {
            Err(Error::Confinement)
        }
    }

    /// Express a confined path relative to the root with `/` separators.
    ///
    /// The root itself maps to the empty string.
    pub fn relative(&self, resolved: &Path) -> Result<String> {
        resolved
            .strip_prefix(&self.path)
            .map(to_slash)
            .map_err(|_| Error::Confinement)
    }
}

/// Fold `.` and `..` without touching the filesystem.
///
/// `..` at the filesystem root stays at the root, as it does on every
/// platform we serve from.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
