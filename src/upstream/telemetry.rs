//! Client for the telemetry service

use std::time::Duration;

use reqwest::StatusCode;

use crate::models::Telemetry;

use super::{Upstream, UpstreamError};

#[derive(Debug, Clone)]
pub struct TelemetryClient {
    upstream: Upstream,
}

impl TelemetryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            upstream: Upstream::new("telemetry-api", base_url, timeout)?,
        })
    }

    /// GET /telemetry/:device_id
    pub async fn by_device(&self, device_id: &str) -> Result<Vec<Telemetry>, UpstreamError> {
        let url = self.upstream.url(&["telemetry", device_id])?;

        let request = self.upstream.http_client.get(url);
        self.upstream.send_json(request, &[StatusCode::OK]).await
    }
}
