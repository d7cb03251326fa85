//! Device API - owns devices and their attribute sets

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use smart_home_devices::api::{self, ApiState};
use smart_home_devices::config::Config;
use smart_home_devices::db::PgDb;
use smart_home_devices::logging;
use smart_home_devices::service::DeviceService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("Starting device API...");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    // One pool for the whole process, handed to both stores
    let db = Arc::new(PgDb::connect(&config).await?);
    if config.database.auto_migrate {
        db.ensure_schema().await?;
    }

    let service = Arc::new(DeviceService::new(db.clone(), db));

    let app = api::routes(ApiState::new(service)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let server = &config.device_api;
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
