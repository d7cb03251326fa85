//! Gateway handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::handlers::{json_body, HealthResponse};
use crate::error::AppError;
use crate::models::{CreateDeviceRequest, MessageResponse, UpdateDeviceRequest};
use crate::service::CONSISTENCY_WARNING_HEADER;

use super::GatewayState;

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "smart-home-gateway".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Pass the device service's consistency warning on to the client
fn forwarded_warning(warning: Option<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(value) = warning.and_then(|w| HeaderValue::from_str(&w).ok()) {
        headers.insert(CONSISTENCY_WARNING_HEADER, value);
    }
    headers
}

#[derive(Debug, Deserialize)]
pub struct ListDevicesQuery {
    #[serde(rename = "houseId")]
    pub house_id: Option<String>,
}

/// GET /devices?houseId=
pub async fn list_devices(
    State(state): State<GatewayState>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let house_id = query
        .house_id
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::BadRequest("houseId is required".to_string()))?;

    let devices = state
        .devices
        .list_by_house(&house_id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch data", e))?;

    Ok(Json(devices))
}

/// GET /devices/:id
pub async fn get_device(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let device = state
        .devices
        .get(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch data", e))?;

    Ok(Json(device))
}

/// POST /devices
pub async fn create_device(
    State(state): State<GatewayState>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let created = state
        .devices
        .create(&payload)
        .await
        .map_err(|e| AppError::upstream("Failed to post data", e))?;

    tracing::info!(device_id = created.value.id, "Device created via gateway");
    Ok((
        StatusCode::CREATED,
        forwarded_warning(created.warning),
        Json(created.value),
    ))
}

/// PUT /devices/:id
pub async fn update_device(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let updated = state
        .devices
        .update(&id, &payload)
        .await
        .map_err(|e| AppError::upstream("Failed to update data", e))?;

    Ok((forwarded_warning(updated.warning), Json(updated.value)))
}

/// DELETE /devices/:id
pub async fn delete_device(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .devices
        .delete(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to delete data", e))?;

    Ok((
        forwarded_warning(deleted.warning),
        Json(MessageResponse::new("Device deleted successfully")),
    ))
}

/// GET /devices/:id/telemetry
///
/// Goes straight to the telemetry service; the device id is not checked
/// against the device service first.
pub async fn get_telemetry(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let telemetry = state
        .telemetry
        .by_device(&id)
        .await
        .map_err(|e| AppError::upstream("Failed to fetch telemetry data", e))?;

    Ok(Json(telemetry))
}
