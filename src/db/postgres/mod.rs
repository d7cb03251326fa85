//! PostgreSQL database module

mod attributes;
mod devices;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

/// PostgreSQL database wrapper
///
/// Built once at startup and shared by reference; the pool handles
/// concurrent use.
#[derive(Clone)]
pub struct PgDb {
    pool: PgPool,
}

impl PgDb {
    /// Connect to PostgreSQL database
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let url = config
            .database
            .url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database URL not configured"))?;

        tracing::info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(url)
            .await?;

        tracing::info!("PostgreSQL connected successfully");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ensure the devices and devices_attributes tables exist (auto-migration on startup)
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                id SERIAL PRIMARY KEY,
                device_model_id INTEGER NOT NULL,
                house_id INTEGER NOT NULL,
                serial_number VARCHAR(255) NOT NULL,
                name VARCHAR(255) NOT NULL,
                status VARCHAR(16) NOT NULL DEFAULT 'active'
                    CHECK (status IN ('active', 'inactive')),
                last_updated TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create devices table: {}", e))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_devices_house_id ON devices (house_id)")
            .execute(&self.pool)
            .await?;

        // No ON DELETE CASCADE: the lifecycle service removes attributes first
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS devices_attributes (
                id SERIAL PRIMARY KEY,
                device_id INTEGER NOT NULL REFERENCES devices (id),
                key VARCHAR(255) NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create devices_attributes table: {}", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_devices_attributes_device_id ON devices_attributes (device_id)",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database schema ready");
        Ok(())
    }
}
