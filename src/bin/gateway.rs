//! Smart home gateway - unified device and telemetry API

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use smart_home_devices::config::Config;
use smart_home_devices::gateway::{self, GatewayState};
use smart_home_devices::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("Starting smart home gateway...");

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        device_api = %config.upstream.device_api_url,
        telemetry_api = %config.upstream.telemetry_api_url,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let state = GatewayState::from_config(&config.upstream)?;

    let app = gateway::routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let server = &config.gateway;
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
