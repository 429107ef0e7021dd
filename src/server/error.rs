//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`reelshelf_common::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelshelf_common::Error;
use serde_json::json;

use crate::streaming::range_not_satisfiable;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Error::UnsatisfiableRange { size } = self.0 {
            return range_not_satisfiable(size);
        }

        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server faults carry OS detail; log it here and send a generic message.
        let message = if self.0.is_server_fault() {
            tracing::error!(status = %status, error = %self.0, "Server error in API handler");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.0.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
