//! The media root and the read/rename operations clients perform on it.
//!
//! - [`MediaRoot`] confines client paths to the configured directory
//! - [`TreeBuilder`] produces [`TreeSnapshot`]s of the directory structure
//! - [`rename_entry`] renames a file within its directory
//! - [`search`] finds playable files by free-text query

mod rename;
mod root;
mod search;
mod tree;

pub use rename::{rename_entry, validate_new_name};
pub use root::MediaRoot;
pub use search::{matches_query, search};
pub use tree::{DirEntries, TreeBuilder, TreeNode, TreeSnapshot};
