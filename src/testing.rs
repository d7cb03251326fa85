//! Shared test helpers: throwaway HTTP servers, sample records and an
//! in-memory device/attribute store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;

use crate::db::{AttributeStore, DeviceStore, DeviceUpdateQuery, UpdateField};
use crate::error::AppError;
use crate::models::{
    CreateDeviceRequest, Device, DeviceAttribute, DeviceStatus, NewDeviceAttribute, Telemetry,
    TelemetryMetric, UpdateDeviceRequest,
};

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a local port nothing listens on
pub async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn sample_device(id: i32) -> Device {
    let now = Utc::now();
    Device {
        id,
        serial_number: format!("SN{}", id),
        device_model_id: 1,
        house_id: 2,
        name: "Thermostat".to_string(),
        status: DeviceStatus::Active,
        attributes: vec![
            DeviceAttribute {
                id: id * 10,
                device_id: id,
                key: "temperature".to_string(),
                value: "18.0".to_string(),
            },
            DeviceAttribute {
                id: id * 10 + 1,
                device_id: id,
                key: "humidity".to_string(),
                value: "30.0".to_string(),
            },
        ],
        last_updated: now,
        created_at: now,
    }
}

pub fn sample_telemetry(device_id: &str) -> Vec<Telemetry> {
    (0..2)
        .map(|_| Telemetry {
            id: "1".to_string(),
            device_id: device_id.to_string(),
            created_at: Utc::now(),
            metrics: vec![
                TelemetryMetric {
                    id: "1".to_string(),
                    key: "temperature".to_string(),
                    value: "21.40".to_string(),
                    unit: "C".to_string(),
                },
                TelemetryMetric {
                    id: "2".to_string(),
                    key: "humidity".to_string(),
                    value: "33.10".to_string(),
                    unit: "%".to_string(),
                },
            ],
            house_id: "2".to_string(),
        })
        .collect()
}

#[derive(Default)]
struct MemoryState {
    next_device_id: i32,
    next_attribute_id: i32,
    devices: BTreeMap<i32, Device>,
    attributes: BTreeMap<i32, DeviceAttribute>,
}

/// In-memory store with the same observable semantics as the Postgres one
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_attribute_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every attribute insert fail from now on
    pub fn fail_attribute_writes(&self) {
        self.fail_attribute_writes.store(true, Ordering::SeqCst);
    }

    pub fn attribute_count(&self, device_id: i32) -> usize {
        let state = self.state.lock().unwrap();
        state
            .attributes
            .values()
            .filter(|a| a.device_id == device_id)
            .count()
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn list_devices(&self, house_id: i32) -> Result<Vec<Device>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .devices
            .values()
            .filter(|d| d.house_id == house_id)
            .cloned()
            .collect())
    }

    async fn get_device(&self, id: i32) -> Result<Device, AppError> {
        let state = self.state.lock().unwrap();
        state
            .devices
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }

    async fn create_device(&self, req: CreateDeviceRequest) -> Result<Device, AppError> {
        let mut state = self.state.lock().unwrap();
        state.next_device_id += 1;
        let now = Utc::now();
        let device = Device {
            id: state.next_device_id,
            serial_number: req.serial_number,
            device_model_id: req.device_model_id,
            house_id: req.house_id,
            name: req.name,
            status: DeviceStatus::Active,
            attributes: Vec::new(),
            last_updated: now,
            created_at: now,
        };
        state.devices.insert(device.id, device.clone());
        Ok(device)
    }

    async fn update_device(&self, id: i32, req: UpdateDeviceRequest) -> Result<Device, AppError> {
        let mut state = self.state.lock().unwrap();
        let device = state
            .devices
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))?;

        let query = DeviceUpdateQuery::new(id, &req, Utc::now());
        for field in query.fields() {
            match field {
                UpdateField::LastUpdated => device.last_updated = Utc::now(),
                UpdateField::Name => device.name = req.name.clone(),
                UpdateField::SerialNumber => device.serial_number = req.serial_number.clone(),
                UpdateField::HouseId => device.house_id = req.house_id,
                UpdateField::DeviceModelId => device.device_model_id = req.device_model_id,
            }
        }
        Ok(device.clone())
    }

    async fn delete_device(&self, id: i32) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        if state.attributes.values().any(|a| a.device_id == id) {
            return Err(AppError::InternalError(
                "foreign key violation on devices_attributes".to_string(),
            ));
        }
        state
            .devices
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }
}

#[async_trait]
impl AttributeStore for MemoryStore {
    async fn list_attributes(&self, device_id: i32) -> Result<Vec<DeviceAttribute>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attributes
            .values()
            .filter(|a| a.device_id == device_id)
            .cloned()
            .collect())
    }

    async fn create_attribute(&self, attr: NewDeviceAttribute) -> Result<DeviceAttribute, AppError> {
        if self.fail_attribute_writes.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("attribute insert failed".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        if !state.devices.contains_key(&attr.device_id) {
            return Err(AppError::InternalError(
                "foreign key violation on devices_attributes".to_string(),
            ));
        }
        state.next_attribute_id += 1;
        let created = DeviceAttribute {
            id: state.next_attribute_id,
            device_id: attr.device_id,
            key: attr.key,
            value: attr.value,
        };
        state.attributes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_attributes(&self, device_id: i32) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.attributes.len();
        state.attributes.retain(|_, a| a.device_id != device_id);

        if state.attributes.len() == before {
            return Err(AppError::NotFound(format!(
                "Attributes for device {} not found",
                device_id
            )));
        }
        Ok(())
    }
}
