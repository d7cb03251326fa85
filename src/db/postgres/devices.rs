//! Devices CRUD operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Postgres;

use crate::db::{BindValue, DeviceStore, DeviceUpdateQuery};
use crate::error::AppError;
use crate::models::{CreateDeviceRequest, Device, DeviceRow, DeviceStatus, UpdateDeviceRequest};

use super::PgDb;

#[async_trait]
impl DeviceStore for PgDb {
    async fn list_devices(&self, house_id: i32) -> Result<Vec<Device>, AppError> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT id, device_model_id, house_id, serial_number, name, status,
                   last_updated, created_at
            FROM devices
            WHERE house_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(house_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Device::try_from).collect()
    }

    async fn get_device(&self, id: i32) -> Result<Device, AppError> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT id, device_model_id, house_id, serial_number, name, status,
                   last_updated, created_at
            FROM devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))?;

        Device::try_from(row)
    }

    async fn create_device(&self, req: CreateDeviceRequest) -> Result<Device, AppError> {
        // Single instant for both timestamps
        let now = Utc::now();

        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            INSERT INTO devices (device_model_id, house_id, serial_number, name, status,
                                 last_updated, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, device_model_id, house_id, serial_number, name, status,
                      last_updated, created_at
            "#,
        )
        .bind(req.device_model_id)
        .bind(req.house_id)
        .bind(&req.serial_number)
        .bind(&req.name)
        .bind(DeviceStatus::Active.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Device::try_from(row)
    }

    async fn update_device(&self, id: i32, req: UpdateDeviceRequest) -> Result<Device, AppError> {
        self.get_device(id).await?;

        let query = DeviceUpdateQuery::new(id, &req, Utc::now());
        let mut statement = sqlx::query_as::<Postgres, DeviceRow>(query.sql());
        for value in query.values() {
            statement = match value {
                BindValue::Timestamp(ts) => statement.bind(*ts),
                BindValue::Text(text) => statement.bind(text.clone()),
                BindValue::Int(n) => statement.bind(*n),
            };
        }

        let row = statement
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))?;

        Device::try_from(row)
    }

    async fn delete_device(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device {} not found", id)));
        }

        Ok(())
    }
}
