//! Smart home device registry and aggregation gateway
//!
//! Two services share this crate: the device API, which owns devices and
//! their attribute sets in PostgreSQL, and the gateway, which fronts the
//! device API and the telemetry service.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod service;
pub mod upstream;

#[cfg(test)]
mod testing;
