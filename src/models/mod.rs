//! Data models for devices, attributes and telemetry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ============================================================================
// Device Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Inactive,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DeviceStatus::Active),
            "inactive" => Ok(DeviceStatus::Inactive),
            _ => Err(format!("Unknown device status: {}", s)),
        }
    }
}

/// A device together with its attribute set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i32,
    pub serial_number: String,
    pub device_model_id: i32,
    pub house_id: i32,
    pub name: String,
    pub status: DeviceStatus,
    #[serde(default)]
    pub attributes: Vec<DeviceAttribute>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Raw device row from database (status kept as text)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    pub id: i32,
    pub device_model_id: i32,
    pub house_id: i32,
    pub serial_number: String,
    pub name: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DeviceRow> for Device {
    type Error = AppError;

    fn try_from(row: DeviceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(AppError::InternalError)?;
        Ok(Device {
            id: row.id,
            serial_number: row.serial_number,
            device_model_id: row.device_model_id,
            house_id: row.house_id,
            name: row.name,
            status,
            attributes: Vec::new(),
            last_updated: row.last_updated,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    pub serial_number: String,
    pub device_model_id: i32,
    pub house_id: i32,
    pub name: String,
}

impl CreateDeviceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.serial_number.is_empty() {
            return Err(AppError::BadRequest("serialNumber is required".to_string()));
        }
        if self.device_model_id <= 0 {
            return Err(AppError::BadRequest(
                "deviceModelId must be positive".to_string(),
            ));
        }
        if self.house_id <= 0 {
            return Err(AppError::BadRequest("houseId must be positive".to_string()));
        }
        if self.name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        Ok(())
    }
}

/// Partial device update.
///
/// An empty `name` or `serial_number` means "leave unchanged". `house_id` and
/// `device_model_id` are always written, so callers must resend them even
/// when they do not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[serde(default)]
    pub serial_number: String,
    pub device_model_id: i32,
    pub house_id: i32,
    #[serde(default)]
    pub name: String,
}

impl UpdateDeviceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.device_model_id <= 0 {
            return Err(AppError::BadRequest(
                "deviceModelId must be positive".to_string(),
            ));
        }
        if self.house_id <= 0 {
            return Err(AppError::BadRequest("houseId must be positive".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Attribute Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAttribute {
    pub id: i32,
    pub device_id: i32,
    pub key: String,
    pub value: String,
}

/// Attribute about to be inserted (no id yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeviceAttribute {
    pub device_id: i32,
    pub key: String,
    pub value: String,
}

impl NewDeviceAttribute {
    pub fn new(device_id: i32, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            device_id,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Attribute set seeded on creation and re-seeded on every update
pub const DEFAULT_ATTRIBUTES: [(&str, &str); 2] = [("temperature", "18.0"), ("humidity", "30.0")];

pub fn default_attributes(device_id: i32) -> Vec<NewDeviceAttribute> {
    DEFAULT_ATTRIBUTES
        .iter()
        .map(|(key, value)| NewDeviceAttribute::new(device_id, *key, *value))
        .collect()
}

// ============================================================================
// Telemetry Models
// ============================================================================

/// Telemetry record as served by the telemetry service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub id: String,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "metricId")]
    pub metrics: Vec<TelemetryMetric>,
    pub house_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMetric {
    pub id: String,
    pub key: String,
    pub value: String,
    pub unit: String,
}

// ============================================================================
// Misc
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
