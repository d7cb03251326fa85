//! Configuration module

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device_api: DeviceApiServerConfig,
    #[serde(default)]
    pub gateway: GatewayServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize)]
pub struct DeviceApiServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_device_api_port")]
    pub port: u16,
}

impl Default for DeviceApiServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_device_api_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_gateway_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            auto_migrate: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_device_api_url")]
    pub device_api_url: String,
    #[serde(default = "default_telemetry_api_url")]
    pub telemetry_api_url: String,
    /// Per-call timeout applied to every upstream request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            device_api_url: default_device_api_url(),
            telemetry_api_url: default_telemetry_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

fn default_device_api_port() -> u16 {
    8081
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_device_api_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_telemetry_api_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("SMARTHOME").separator("__"))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        Ok(settings.try_deserialize()?)
    }
}
