//! Direct streaming with HTTP range requests.
//!
//! Serves files from the media root with support for single-span range
//! requests. Bytes are copied through a fixed-size buffer, so memory per
//! request stays bounded no matter how large the requested span is.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use reelshelf_common::paths::content_type_for;
use reelshelf_common::{Error, Result};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::select_range;

/// Copy buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Stream the file at `path`, honouring an optional `Range` header value.
///
/// `path` must already be confined to the media root. Missing files and
/// directories are [`Error::NotFound`]; a header that does not parse or does
/// not fit the file is [`Error::UnsatisfiableRange`].
///
/// The file handle lives inside the response body. If the client goes away
/// mid-transfer the body is dropped and the file closed; that is not an error.
pub async fn stream_file(
    path: &Path,
    range_header: Option<&str>,
    buffer_size: usize,
) -> Result<Response> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| Error::not_found("file"))?;
    if metadata.is_dir() {
        return Err(Error::not_found("file"));
    }

    let file_size = metadata.len();
    let content_type = content_type_for(path);

    let Some(range_header) = range_header else {
        let file = File::open(path).await?;

        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, file_size.to_string())
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body_from_reader(file, buffer_size))
            .map_err(|e| Error::Io(std::io::Error::other(e)));
    };

    let range = select_range(range_header, file_size).map_err(|e| {
        tracing::debug!(range = %range_header, error = %e, "Rejecting range request");
        Error::UnsatisfiableRange { size: file_size }
    })?;
    let length = range.length();

    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(range.start)).await?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length.to_string())
        .header(header::CONTENT_RANGE, range.content_range(file_size))
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body_from_reader(file.take(length), buffer_size))
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Wrap a reader in a body that reads at most `buffer_size` bytes at a time.
fn body_from_reader<R>(reader: R, buffer_size: usize) -> Body
where
    R: AsyncRead + Send + 'static,
{
    let stream = ReaderStream::with_capacity(reader, buffer_size.max(1)).inspect_err(|e| {
        tracing::debug!(error = %e, "Read failed mid-stream");
    });
    Body::from_stream(stream)
}

/// Build the empty 416 response for a resource of `size` bytes.
pub fn range_not_satisfiable(size: u64) -> Response {
    (
        StatusCode::RANGE_NOT_SATISFIABLE,
        [
            (header::CONTENT_RANGE, format!("bytes */{size}")),
            (header::ACCEPT_RANGES, "bytes".to_string()),
        ],
    )
        .into_response()
}
