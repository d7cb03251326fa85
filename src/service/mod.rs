//! Device lifecycle service
//!
//! Bundles device mutations with their attribute side effects:
//! create seeds the default attributes, update wipes and re-seeds them,
//! delete removes them before the device row. The steps are not atomic.
//! When an attribute step fails after the device row has changed, the
//! device change stands and a [`ConsistencyWarning`] is returned with it.

mod consistency;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::db::{AttributeStore, DeviceStore};
use crate::error::AppError;
use crate::models::{
    default_attributes, CreateDeviceRequest, Device, DeviceAttribute, UpdateDeviceRequest,
};

pub use self::consistency::{
    AttributeStep, ConsistencyWarning, Outcome, CONSISTENCY_WARNING_HEADER,
};

pub struct DeviceService {
    devices: Arc<dyn DeviceStore>,
    attributes: Arc<dyn AttributeStore>,
}

impl DeviceService {
    pub fn new(devices: Arc<dyn DeviceStore>, attributes: Arc<dyn AttributeStore>) -> Self {
        Self {
            devices,
            attributes,
        }
    }

    /// List devices of a house with their attributes.
    ///
    /// A device whose attributes cannot be loaded is still listed, with an
    /// empty attribute set.
    pub async fn list(&self, house_id: i32) -> Result<Vec<Device>, AppError> {
        let mut devices = self.devices.list_devices(house_id).await?;

        for device in devices.iter_mut() {
            match self.attributes.list_attributes(device.id).await {
                Ok(attrs) => device.attributes = attrs,
                Err(e) => {
                    warn!(device_id = device.id, error = %e, "Failed to load device attributes");
                    device.attributes = Vec::new();
                }
            }
        }

        debug!(house_id, count = devices.len(), "Listed devices");
        Ok(devices)
    }

    /// Get one device with its attributes. Fails if the attributes cannot be loaded.
    pub async fn get(&self, id: i32) -> Result<Device, AppError> {
        let mut device = self.devices.get_device(id).await?;

        device.attributes = self.attributes.list_attributes(id).await.map_err(|e| {
            warn!(device_id = id, error = %e, "Failed to load device attributes");
            AppError::NotFound("Device attributes not found".to_string())
        })?;

        Ok(device)
    }

    pub async fn create(&self, req: CreateDeviceRequest) -> Result<Outcome<Device>, AppError> {
        req.validate()?;

        let mut device = self.devices.create_device(req).await?;
        info!(device_id = device.id, house_id = device.house_id, "Device created");

        let mut warnings = Vec::new();
        let (attrs, seed_warning) = self.seed_defaults(device.id).await;
        device.attributes = attrs;
        warnings.extend(seed_warning);

        Ok(Outcome {
            value: device,
            warnings,
        })
    }

    /// Apply a partial update, then reset the attribute set to the defaults.
    pub async fn update(
        &self,
        id: i32,
        req: UpdateDeviceRequest,
    ) -> Result<Outcome<Device>, AppError> {
        req.validate()?;

        let mut device = self.devices.update_device(id, req).await?;
        info!(device_id = id, "Device updated");

        // TODO: caller-set attribute values are discarded here; keep them once
        // attributes get their own write endpoint.
        let mut warnings: Vec<_> = self.clear_attributes(id).await.into_iter().collect();

        let (attrs, seed_warning) = self.seed_defaults(id).await;
        device.attributes = attrs;
        warnings.extend(seed_warning);

        Ok(Outcome {
            value: device,
            warnings,
        })
    }

    /// Remove the attributes, then the device. The device row is deleted even
    /// when clearing attributes fails.
    pub async fn delete(&self, id: i32) -> Result<Outcome<()>, AppError> {
        let warnings: Vec<_> = self.clear_attributes(id).await.into_iter().collect();

        self.devices.delete_device(id).await?;
        info!(device_id = id, "Device deleted");

        Ok(Outcome {
            value: (),
            warnings,
        })
    }

    /// Delete every attribute of a device. A device that has none is left
    /// as is; only real failures become a warning.
    async fn clear_attributes(&self, device_id: i32) -> Option<ConsistencyWarning> {
        match self.attributes.delete_attributes(device_id).await {
            Ok(()) => None,
            Err(AppError::NotFound(_)) => {
                debug!(device_id, "No attributes to clear");
                None
            }
            Err(e) => {
                let warning = ConsistencyWarning::new(device_id, AttributeStep::Clear, &e);
                warn!(device_id, "{}", warning);
                Some(warning)
            }
        }
    }

    /// Insert the default attribute pair, stopping at the first failure.
    async fn seed_defaults(
        &self,
        device_id: i32,
    ) -> (Vec<DeviceAttribute>, Option<ConsistencyWarning>) {
        let mut created = Vec::new();

        for attr in default_attributes(device_id) {
            match self.attributes.create_attribute(attr).await {
                Ok(attr) => created.push(attr),
                Err(e) => {
                    let warning = ConsistencyWarning::new(device_id, AttributeStep::Seed, &e);
                    warn!(device_id, "{}", warning);
                    return (created, Some(warning));
                }
            }
        }

        (created, None)
    }
}
