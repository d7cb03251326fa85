//! Device API module - HTTP handlers and routes of the primary service

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::service::DeviceService;

/// Shared state of the primary service
#[derive(Clone)]
pub struct ApiState {
    pub devices: Arc<DeviceService>,
}

impl ApiState {
    pub fn new(devices: Arc<DeviceService>) -> Self {
        Self { devices }
    }
}

pub fn routes(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Devices
        .route("/devices", get(handlers::list_devices))
        .route("/devices", post(handlers::create_device))
        .route("/devices/:id", get(handlers::get_device))
        .route("/devices/:id", put(handlers::update_device))
        .route("/devices/:id", delete(handlers::delete_device))
        .with_state(state)
}
