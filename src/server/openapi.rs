//! OpenAPI documentation and Swagger UI integration.
//!
//! This module provides OpenAPI 3.0 documentation for the Reelshelf API.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::AppContext;

/// OpenAPI documentation for Reelshelf.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelshelf API",
        version = "0.1.0",
        description = "Browse a local media directory and stream files with HTTP range support",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "/", description = "Default server")
    ),
    paths(
        super::routes_api::health,
        super::routes_library::get_tree,
        super::routes_library::rename_file,
        super::routes_library::search_files,
        super::routes_stream::stream,
    ),
    components(
        schemas(
            super::routes_api::HealthResponse,
            super::routes_library::RenameRequest,
            super::routes_library::RenameResponse,
            super::routes_library::SearchResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "library", description = "Directory tree, rename and search"),
        (name = "stream", description = "Range-aware file streaming"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/api/docs` and the raw document at `/api/openapi.json`.
///
/// Mounted at the router root so the UI and the document share one prefix.
pub fn openapi_routes() -> Router<AppContext> {
    Router::new().merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/api/tree", "/api/stream", "/api/rename", "/api/search", "/api/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
