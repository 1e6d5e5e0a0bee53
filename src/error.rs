use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// AppError
///
/// The single failure channel for the read routes. Both a failed query
/// and a missing record surface the same way: HTTP 500 with a JSON error
/// body. The message is a purpose-built summary, not the raw driver
/// error, so internals are not leaked to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("database query failed")]
    Query(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Query(err) => {
                tracing::error!("query error: {:?}", err);
            }
            AppError::NotFound(what) => {
                tracing::warn!("lookup miss: {} not found", what);
            }
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
