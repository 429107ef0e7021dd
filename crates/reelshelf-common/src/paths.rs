//! Path utilities for media files.
//!
//! Extension checks, content type lookup, and rendering of root-relative
//! paths in the forward-slash form clients see regardless of platform.

use std::path::{Component, Path};

/// Extensions playable in the browser UI out of the box.
const DEFAULT_PLAYABLE_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "webm"];

/// Lowercased extension of `path`, if it has a UTF-8 one.
fn lower_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Extensions enabled when no configuration overrides them.
#[must_use]
pub fn default_playable_extensions() -> &'static [&'static str] {
    DEFAULT_PLAYABLE_EXTENSIONS
}

/// Determine the `Content-Type` to serve for a file, by extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn content_type_for(path: &Path) -> &'static str {
    match lower_extension(path).as_deref().unwrap_or("") {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "ts" | "m2ts" => "video/mp2t",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Render a relative path with `/` separators.
///
/// Only normal components are kept, so the output never contains `.`,
/// `..` or a leading slash.
///
/// ```
/// use std::path::Path;
/// use reelshelf_common::paths::to_slash;
///
/// assert_eq!(to_slash(Path::new("shows/s01/e01.mkv")), "shows/s01/e01.mkv");
/// ```
pub fn to_slash(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Set of enabled file extensions.
///
/// A file is disabled unless its lowercased extension is in the set; files
/// without an extension are always disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    enabled: Vec<String>,
}

impl ExtensionFilter {
    /// Build a filter from extensions given with or without a leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut enabled: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        enabled.sort();
        enabled.dedup();
        Self { enabled }
    }

    pub fn is_disabled(&self, path: &Path) -> bool {
        !self.is_enabled(path)
    }

    pub fn is_enabled(&self, path: &Path) -> bool {
        lower_extension(path)
            .map(|ext| self.enabled.binary_search(&ext).is_ok())
            .unwrap_or(false)
    }

    /// Enabled extensions, lowercased and sorted.
    pub fn extensions(&self) -> &[String] {
        &self.enabled
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYABLE_EXTENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a.mp4")), "video/mp4");
        assert_eq!(content_type_for(Path::new("a.MKV")), "video/x-matroska");
        assert_eq!(content_type_for(Path::new("a.webm")), "video/webm");
        assert_eq!(content_type_for(Path::new("a.mov")), "video/quicktime");
        assert_eq!(
            content_type_for(Path::new("a.unknown")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("Makefile")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("a.mp4")), "a.mp4");
        assert_eq!(to_slash(Path::new("b/c.mkv")), "b/c.mkv");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[test]
    fn test_default_filter() {
        let filter = ExtensionFilter::default();
        assert!(!filter.is_disabled(Path::new("/videos/movie.mp4")));
        assert!(!filter.is_disabled(Path::new("/videos/movie.Mp4")));
        assert!(!filter.is_disabled(Path::new("/videos/movie.MP4")));
        assert!(!filter.is_disabled(Path::new("/videos/movie.mkv")));
        assert!(!filter.is_disabled(Path::new("/videos/movie.webm")));
        assert!(filter.is_disabled(Path::new("/videos/.DStore")));
        assert!(filter.is_disabled(Path::new("/videos/notes.txt")));
    }

    #[test]
    fn test_filter_normalizes_input() {
        let filter = ExtensionFilter::new([".MP4", "mkv", " avi ", "", "mkv"]);
        assert_eq!(filter.extensions(), &["avi", "mkv", "mp4"]);
        assert!(filter.is_enabled(Path::new("x.avi")));
        assert!(filter.is_disabled(Path::new("x.webm")));
    }
}
