//! Free-text search over playable files.

use reelshelf_common::paths::ExtensionFilter;
use reelshelf_common::Result;
use std::fs;
use walkdir::WalkDir;

use super::MediaRoot;

/// Case-insensitive token match.
///
/// The query is split on whitespace and every token must appear somewhere
/// in `path`. A blank query matches everything.
pub fn matches_query(path: &str, query: &str) -> bool {
    let haystack = path.to_lowercase();
    query
        .split_whitespace()
        .all(|token| haystack.contains(&token.to_lowercase()))
}

/// Relative paths of enabled files under `root` matching `query`.
///
/// Results are sorted by relative path. Entries that cannot be read are
/// skipped.
pub fn search(root: &MediaRoot, filter: &ExtensionFilter, query: &str) -> Result<Vec<String>> {
    fs::read_dir(root.path())?;

    let mut results = Vec::new();
    for entry in WalkDir::new(root.path())
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() || filter.is_disabled(entry.path()) {
            continue;
        }
        let Ok(rel) = root.relative(entry.path()) else {
            continue;
        };
        if matches_query(&rel, query) {
            results.push(rel);
        }
    }

    results.sort();
    tracing::debug!(query = %query, matches = results.len(), "Search complete");
    Ok(results)
}
