//! Database module - device and attribute storage

pub mod postgres;
mod update_query;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    CreateDeviceRequest, Device, DeviceAttribute, NewDeviceAttribute, UpdateDeviceRequest,
};

pub use self::postgres::PgDb;
pub use self::update_query::{BindValue, DeviceUpdateQuery, UpdateField, UpdateRule};

/// Storage operations on the `devices` relation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Devices of a house ordered by id; empty when none match
    async fn list_devices(&self, house_id: i32) -> Result<Vec<Device>, AppError>;

    /// Fails with `NotFound` when no row matches
    async fn get_device(&self, id: i32) -> Result<Device, AppError>;

    /// Insert a device with status `active`
    async fn create_device(&self, req: CreateDeviceRequest) -> Result<Device, AppError>;

    /// Partial update; see [`DeviceUpdateQuery`]
    async fn update_device(&self, id: i32, req: UpdateDeviceRequest) -> Result<Device, AppError>;

    /// Fails with `NotFound` when no row was deleted
    async fn delete_device(&self, id: i32) -> Result<(), AppError>;
}

/// Storage operations on the `devices_attributes` relation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Attributes of a device ordered by id
    async fn list_attributes(&self, device_id: i32) -> Result<Vec<DeviceAttribute>, AppError>;

    /// Insert one attribute. Duplicate keys are not checked.
    async fn create_attribute(&self, attr: NewDeviceAttribute) -> Result<DeviceAttribute, AppError>;

    /// Remove every attribute of a device. Deleting zero rows is a `NotFound`.
    async fn delete_attributes(&self, device_id: i32) -> Result<(), AppError>;
}
