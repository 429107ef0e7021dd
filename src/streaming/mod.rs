//! Media streaming module.
//!
//! Provides direct file streaming with HTTP range support so a browser's
//! video element can seek without downloading the whole file.
//!
//! - [`ByteRange`] parses a `Range` header against a resource size
//! - [`stream_file`] builds the 200/206 response for a confined path

mod direct;
mod range;

pub use direct::{range_not_satisfiable, stream_file, DEFAULT_BUFFER_SIZE};
pub use range::{select_range, ByteRange, RangeError};
