//! Common error types used throughout reelshelf.
//!
//! Every fallible operation on the media root funnels its failure into
//! [`Error`], which carries enough context for the HTTP layer to pick a
//! status code via [`Error::http_status`]. None of the variants carry an
//! absolute filesystem path, so the `Display` output is safe to show to a
//! client.

/// Common error type for reelshelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A client-supplied path resolved outside the media root.
    #[error("Invalid path")]
    Confinement,

    /// The `Range` header could not be parsed.
    #[error("Malformed range: {0}")]
    Range(String),

    /// The `Range` header parsed but does not fit inside the resource.
    #[error("Requested range not satisfiable")]
    UnsatisfiableRange {
        /// Size of the resource in bytes, echoed in `Content-Range: bytes */size`.
        size: u64,
    },

    /// The requested entry does not exist (or is the wrong kind of entry).
    #[error("{0} not found")]
    NotFound(String),

    /// Request data failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// An I/O operation failed after validation passed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Confinement => 400,
            Error::Range(_) => 416,
            Error::UnsatisfiableRange { .. } => 416,
            Error::NotFound(_) => 404,
            Error::Validation(_) => 400,
            Error::Io(_) => 500,
        }
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Confinement => "invalid_path",
            Error::Range(_) => "malformed_range",
            Error::UnsatisfiableRange { .. } => "range_not_satisfiable",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Io(_) => "io_error",
        }
    }

    /// Whether the failure is the server's fault rather than the client's.
    pub fn is_server_fault(&self) -> bool {
        self.http_status() >= 500
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Range error.
    pub fn range<S: Into<String>>(msg: S) -> Self {
        Self::Range(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
