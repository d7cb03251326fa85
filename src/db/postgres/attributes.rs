//! Device attributes CRUD operations

use async_trait::async_trait;

use crate::db::AttributeStore;
use crate::error::AppError;
use crate::models::{DeviceAttribute, NewDeviceAttribute};

use super::PgDb;

#[async_trait]
impl AttributeStore for PgDb {
    async fn list_attributes(&self, device_id: i32) -> Result<Vec<DeviceAttribute>, AppError> {
        let attrs = sqlx::query_as::<_, DeviceAttribute>(
            r#"
            SELECT id, device_id, key, value
            FROM devices_attributes
            WHERE device_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(device_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attrs)
    }

    async fn create_attribute(&self, attr: NewDeviceAttribute) -> Result<DeviceAttribute, AppError> {
        let created = sqlx::query_as::<_, DeviceAttribute>(
            r#"
            INSERT INTO devices_attributes (device_id, key, value)
            VALUES ($1, $2, $3)
            RETURNING id, device_id, key, value
            "#,
        )
        .bind(attr.device_id)
        .bind(&attr.key)
        .bind(&attr.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn delete_attributes(&self, device_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM devices_attributes WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Attributes for device {} not found",
                device_id
            )));
        }

        Ok(())
    }
}
