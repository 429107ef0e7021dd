//! HTTP `Range` header parsing.
//!
//! Parsing and bounds checking are separate steps: [`ByteRange::parse`]
//! only interprets the syntax against the resource size, and
//! [`ByteRange::is_satisfiable`] decides whether the interval fits.

use reelshelf_common::Error;

/// Why a `Range` header could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("empty range header")]
    Empty,

    #[error("unsupported range unit")]
    UnsupportedUnit,

    #[error("multiple ranges are not supported")]
    MultipleRanges,

    #[error("malformed byte range")]
    Malformed,
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Error::range(e.to_string())
    }
}

/// Inclusive byte interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Parse a single-span `Range` header value.
    ///
    /// Supports formats:
    /// - `bytes=0-499`
    /// - `bytes=500-` (to the end of the resource)
    /// - `bytes=-500` (last 500 bytes, clamped to the whole resource)
    pub fn parse(header: &str, size: u64) -> Result<Self, RangeError> {
        let header = header.trim();
        if header.is_empty() {
            return Err(RangeError::Empty);
        }

        let ranges = header
            .strip_prefix("bytes=")
            .ok_or(RangeError::UnsupportedUnit)?;
        if ranges.contains(',') {
            return Err(RangeError::MultipleRanges);
        }

        let (start, end) = ranges.split_once('-').ok_or(RangeError::Malformed)?;
        let (start, end) = (start.trim(), end.trim());
        let last = size.saturating_sub(1);

        match (start.is_empty(), end.is_empty()) {
            // bytes=-500
            (true, false) => {
                let suffix = parse_offset(end)?.min(size);
                Ok(Self {
                    start: size - suffix,
                    end: last,
                })
            }
            // bytes=500-
            (false, true) => Ok(Self {
                start: parse_offset(start)?,
                end: last,
            }),
            // bytes=0-499
            (false, false) => Ok(Self {
                start: parse_offset(start)?,
                end: parse_offset(end)?,
            }),
            // bytes=-
            (true, true) => Err(RangeError::Malformed),
        }
    }

    /// `start <= end < size`.
    pub fn is_satisfiable(&self, size: u64) -> bool {
        self.start <= self.end && self.end < size
    }

    /// Number of bytes covered. Only meaningful for satisfiable ranges.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a 206 response.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Parse and bounds-check a header in one go.
///
/// Malformed headers map to [`Error::Range`], out-of-bounds intervals to
/// [`Error::UnsatisfiableRange`].
pub fn select_range(header: &str, size: u64) -> Result<ByteRange, Error> {
    let range = ByteRange::parse(header, size)?;
    if !range.is_satisfiable(size) {
        return Err(Error::UnsatisfiableRange { size });
    }
    Ok(range)
}

fn parse_offset(s: &str) -> Result<u64, RangeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    s.parse().map_err(|_| RangeError::Malformed)
}
