//! Library API routes.
//!
//! Tree snapshots, renaming, and search over the media root.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use reelshelf_common::Error;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::error::AppError;
use super::AppContext;
use crate::library::{self, rename_entry, TreeBuilder, TreeSnapshot};

/// Create library routes.
pub fn library_routes() -> Router<AppContext> {
    Router::new()
        .route("/tree", get(get_tree))
        .route("/rename", post(rename_file))
        .route("/search", get(search_files))
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Request to rename a file within its directory.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameRequest {
    /// Current path, relative to the media root
    #[serde(default)]
    pub path: String,
    /// New file name (no separators)
    #[serde(default)]
    pub new_name: String,
}

/// Result of a successful rename.
#[derive(Debug, Serialize, ToSchema)]
pub struct RenameResponse {
    pub ok: bool,
    /// New path relative to the media root, `/`-separated
    pub new_path: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Whitespace-separated terms; all must match
    #[serde(default)]
    pub q: String,
}

/// Search results.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    /// Matching paths relative to the media root
    pub results: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Snapshot the media root.
#[utoipa::path(
    get,
    path = "/api/tree",
    tag = "library",
    responses(
        (status = 200, description = "Directory tree keyed by the root's name"),
        (status = 500, description = "Media root unreadable")
    )
)]
pub async fn get_tree(State(ctx): State<AppContext>) -> Result<Json<TreeSnapshot>, AppError> {
    let mut builder = TreeBuilder::new();
    if ctx.config.library.hide_unsupported {
        builder = builder.with_filter(ctx.config.extension_filter());
    }

    let root = ctx.root.clone();
    let snapshot = tokio::task::spawn_blocking(move || builder.build(root.path()))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;

    Ok(Json(snapshot))
}

/// Rename a file within its directory.
#[utoipa::path(
    post,
    path = "/api/rename",
    tag = "library",
    request_body = RenameRequest,
    responses(
        (status = 200, description = "File renamed", body = RenameResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Source file not found"),
        (status = 500, description = "Rename failed")
    )
)]
pub async fn rename_file(
    State(ctx): State<AppContext>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<RenameResponse>, AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected rename body");
        Error::validation("invalid json")
    })?;

    let new_path = rename_entry(&ctx.root, &request.path, &request.new_name).await?;

    Ok(Json(RenameResponse { ok: true, new_path }))
}

/// Find playable files whose path matches every search term.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "library",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching files", body = SearchResponse),
        (status = 500, description = "Media root unreadable")
    )
)]
pub async fn search_files(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let root = ctx.root.clone();
    let filter = ctx.config.extension_filter();
    let query = params.q.clone();

    let results = tokio::task::spawn_blocking(move || library::search(&root, &filter, &query))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;

    Ok(Json(SearchResponse {
        query: params.q,
        results,
    }))
}
