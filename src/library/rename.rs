//! Renaming files in place.
//!
//! A rename only ever changes the final component: the new name is checked
//! for separators before anything touches the filesystem, and the resulting
//! path is confined again before the OS call.

use reelshelf_common::{Error, Result};

use super::MediaRoot;

/// Check that `new_name` names a sibling entry rather than a path.
pub fn validate_new_name(new_name: &str) -> Result<()> {
    if new_name.contains(['/', '\\']) {
        return Err(Error::validation("new_name must be filename only"));
    }
    if new_name == "." || new_name == ".." || new_name.contains('\0') {
        return Err(Error::validation("new_name is not a valid filename"));
    }
    Ok(())
}

/// Rename the entry at `rel` to `new_name` within the same directory.
///
/// Returns the new path relative to the root with `/` separators. An
/// existing entry with the new name is replaced, as the platform rename
/// would do.
pub async fn rename_entry(root: &MediaRoot, rel: &str, new_name: &str) -> Result<String> {
    if rel.is_empty() || new_name.is_empty() {
        return Err(Error::validation("path and new_name required"));
    }
    validate_new_name(new_name)?;

    let old_path = root.resolve(rel)?;
    if old_path == root.path() {
        return Err(Error::validation("cannot rename the media root"));
    }
    tokio::fs::metadata(&old_path)
        .await
        .map_err(|_| Error::not_found("file"))?;

    let dir = old_path.parent().ok_or(Error::Confinement)?;
    let new_path = root.confine(&dir.join(new_name))?;

    tokio::fs::rename(&old_path, &new_path).await?;

    let new_rel = root.relative(&new_path)?;
    tracing::info!(from = %rel, to = %new_rel, "Renamed file");
    Ok(new_rel)
}
