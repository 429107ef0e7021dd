//! Reelshelf-Common: Shared types and utilities.
//!
//! This crate provides the pieces used by every part of reelshelf:
//!
//! - **Error Handling**: The error taxonomy shared by path resolution, range
//!   parsing, tree building and renaming, plus its HTTP status mapping
//! - **Path Utilities**: Playable extension filtering, content type lookup and
//!   forward-slash rendering of relative paths
//!
//! # Examples
//!
//! ```
//! use reelshelf_common::{Error, Result};
//! use reelshelf_common::paths::{content_type_for, ExtensionFilter};
//! use std::path::Path;
//!
//! assert!(ExtensionFilter::default().is_enabled(Path::new("movie.MKV")));
//! assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("file"))
//! }
//! assert_eq!(example().unwrap_err().http_status(), 404);
//! ```

pub mod error;
pub mod paths;

pub use error::{Error, Result};
