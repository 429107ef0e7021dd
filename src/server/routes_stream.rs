//! Streaming route.
//!
//! `GET /api/stream?path=<relative path>` with an optional `Range` header.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::Response,
    routing::get,
    Router,
};
use reelshelf_common::Error;
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::AppError;
use super::AppContext;
use crate::streaming::stream_file;

/// Create streaming routes.
pub fn stream_routes() -> Router<AppContext> {
    Router::new().route("/stream", get(stream))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StreamQuery {
    /// File path relative to the media root
    pub path: Option<String>,
}

/// Serve a file with HTTP range support.
#[utoipa::path(
    get,
    path = "/api/stream",
    tag = "stream",
    params(StreamQuery),
    responses(
        (status = 200, description = "Whole file"),
        (status = 206, description = "Requested byte range"),
        (status = 400, description = "Missing or invalid path"),
        (status = 404, description = "File not found"),
        (status = 416, description = "Range not satisfiable"),
        (status = 500, description = "File could not be read")
    )
)]
pub async fn stream(
    State(ctx): State<AppContext>,
    Query(params): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rel = params
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::validation("path required"))?;
    let file_path = ctx.root.resolve(&rel)?;

    // An empty Range header means no range.
    let range = headers
        .get(header::RANGE)
        .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned())
        .filter(|r| !r.trim().is_empty());

    let response = stream_file(
        &file_path,
        range.as_deref(),
        ctx.config.server.stream_buffer_size,
    )
    .await?;
    tracing::debug!(path = %rel, status = %response.status(), "Streaming file");
    Ok(response)
}
