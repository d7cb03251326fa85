//! Aggregation gateway - fronts the device and telemetry services
//!
//! Every request is validated locally, then forwarded to exactly one
//! upstream. There is no retry and no fallback: any upstream failure
//! (transport, timeout, status, decode) becomes a 500 carrying the error
//! text.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::config::UpstreamConfig;
use crate::upstream::{DeviceClient, TelemetryClient, UpstreamError};

/// Shared gateway state; clients are built once and never mutated
#[derive(Clone)]
pub struct GatewayState {
    pub devices: Arc<DeviceClient>,
    pub telemetry: Arc<TelemetryClient>,
}

impl GatewayState {
    pub fn new(devices: DeviceClient, telemetry: TelemetryClient) -> Self {
        Self {
            devices: Arc::new(devices),
            telemetry: Arc::new(telemetry),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let devices = DeviceClient::new(&config.device_api_url, config.timeout())?;
        let telemetry = TelemetryClient::new(&config.telemetry_api_url, config.timeout())?;
        Ok(Self::new(devices, telemetry))
    }
}

pub fn routes(state: GatewayState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Devices (proxied to the device service)
        .route("/devices", get(handlers::list_devices))
        .route("/devices", post(handlers::create_device))
        .route("/devices/:id", get(handlers::get_device))
        .route("/devices/:id", put(handlers::update_device))
        .route("/devices/:id", delete(handlers::delete_device))
        // Telemetry (proxied to the telemetry service)
        .route("/devices/:id/telemetry", get(handlers::get_telemetry))
        .with_state(state)
}
