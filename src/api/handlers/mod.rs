//! HTTP handlers module

mod devices;

pub use self::devices::*;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::service::ConsistencyWarning;

pub use crate::service::CONSISTENCY_WARNING_HEADER;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "device-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Unwrap a JSON body, turning decode failures into 400s
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Parse a path id, rejecting anything that is not an integer
pub fn parse_device_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid device ID".to_string()))
}

/// Headers reporting consistency warnings; empty when there are none
pub fn warning_headers(warnings: &[ConsistencyWarning]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if warnings.is_empty() {
        return headers;
    }

    let joined = warnings
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    match HeaderValue::from_str(&joined) {
        Ok(value) => {
            headers.insert(CONSISTENCY_WARNING_HEADER, value);
        }
        Err(_) => {
            headers.insert(
                CONSISTENCY_WARNING_HEADER,
                HeaderValue::from_static("attribute set may be incomplete"),
            );
        }
    }
    headers
}
