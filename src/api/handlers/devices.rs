//! Device handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::ApiState;
use crate::error::AppError;
use crate::models::{CreateDeviceRequest, MessageResponse, UpdateDeviceRequest};

use super::{json_body, parse_device_id, warning_headers};

#[derive(Debug, Deserialize)]
pub struct ListDevicesQuery {
    #[serde(rename = "houseId")]
    pub house_id: Option<String>,
}

/// GET /devices?houseId= - List devices of a house with their attributes
pub async fn list_devices(
    State(state): State<ApiState>,
    Query(query): Query<ListDevicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let raw = query
        .house_id
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::BadRequest("houseId is required".to_string()))?;
    let house_id: i32 = raw
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid houseId".to_string()))?;

    let devices = state.devices.list(house_id).await?;
    Ok(Json(devices))
}

/// GET /devices/:id - Get a single device with its attributes
pub async fn get_device(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_device_id(&id)?;
    let device = state.devices.get(id).await?;
    Ok(Json(device))
}

/// POST /devices - Create a device and seed its default attributes
pub async fn create_device(
    State(state): State<ApiState>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;

    let outcome = state.devices.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        warning_headers(&outcome.warnings),
        Json(outcome.value),
    ))
}

/// PUT /devices/:id - Partially update a device and reset its attributes
pub async fn update_device(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_device_id(&id)?;
    let payload = json_body(payload)?;

    let outcome = state.devices.update(id, payload).await?;

    Ok((warning_headers(&outcome.warnings), Json(outcome.value)))
}

/// DELETE /devices/:id - Delete a device and its attributes
///
/// Every storage failure is a 500 here, a missing device included.
pub async fn delete_device(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_device_id(&id)?;

    let outcome = state.devices.delete(id).await.map_err(|e| match e {
        AppError::NotFound(msg) => AppError::InternalError(msg),
        other => other,
    })?;

    Ok((
        warning_headers(&outcome.warnings),
        Json(MessageResponse::new("Device deleted successfully")),
    ))
}
