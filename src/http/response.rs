//! Error-to-response mapping.
//!
//! Every failure a handler can produce is an [`AppError`]; its
//! `IntoResponse` impl is the single place status codes and error bodies
//! are decided.
//!
//! | Error        | Status | Body                                          |
//! |--------------|--------|-----------------------------------------------|
//! | `Validation` | 400    | `{"error": "<message>"}`                      |
//! | `Upstream`   | 500    | `{"error": "Grammar check failed", "detail"}` |
//! | `Render`     | 500    | `{"error": "Failed to parse markdown"}`       |
//! | `Body`       | 4xx    | body reader's own rejection (413 when too big)|

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::grammar::UpstreamError;
use crate::http::request::ValidationError;
use crate::render::RenderError;

/// Failures surfaced to API callers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to read request body: {0}")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error = %e, "Rejected request payload");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            AppError::Upstream(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Grammar check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Grammar check failed", "detail": e.to_string() })),
                )
                    .into_response()
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "Markdown parsing error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to parse markdown" })),
                )
                    .into_response()
            }
            AppError::Body(rejection) => {
                tracing::warn!(error = %rejection, "Failed to read request body");
                rejection.into_response()
            }
        }
    }
}
