//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// An upstream call failed. `context` is the client-facing prefix,
    /// e.g. "Failed to fetch data".
    #[error("{context}: {source}")]
    UpstreamError {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl AppError {
    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        AppError::UpstreamError { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Upstream 404 and upstream outage both land here.
            AppError::UpstreamError { .. }
            | AppError::InternalError(_)
            | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InternalError(msg) => msg.clone(),
            AppError::DatabaseError(e) => e.to_string(),
            AppError::UpstreamError { .. } => self.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::upstream("Failed to fetch data", UpstreamError::Status(404)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_embeds_cause() {
        let err = AppError::upstream("Failed to fetch telemetry data", UpstreamError::Status(503));
        assert_eq!(
            err.to_string(),
            "Failed to fetch telemetry data: unexpected status code: 503"
        );
    }
}
