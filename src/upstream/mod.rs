//! Typed HTTP clients for the upstream device and telemetry services
//!
//! Each client owns a `reqwest::Client` built once with the fixed per-call
//! timeout. Clients are immutable after construction and shared across
//! requests.

mod device;
mod telemetry;

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::service::CONSISTENCY_WARNING_HEADER;

pub use self::device::DeviceClient;
pub use self::telemetry::TelemetryClient;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,

    #[error("error sending request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(u16),

    #[error("error decoding response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Result of a device mutation, with the consistency warning the device
/// service attached to its response, if any
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub warning: Option<String>,
}

/// Connection details shared by the typed clients
#[derive(Debug, Clone)]
struct Upstream {
    name: &'static str,
    base_url: Url,
    http_client: reqwest::Client,
}

impl Upstream {
    fn new(name: &'static str, base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self {
            name,
            base_url,
            http_client,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request, failing unless the status is one of `accepted`
    async fn send(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = request.send().await.map_err(|e| self.failed(e.into()))?;

        let status = response.status();
        if !accepted.contains(&status) {
            return Err(self.failed(UpstreamError::Status(status.as_u16())));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<T, UpstreamError> {
        let response = self.send(request, accepted).await?;
        self.decode(response).await
    }

    /// Like `send_json`, keeping the consistency warning header
    async fn send_mutation<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<Mutation<T>, UpstreamError> {
        let response = self.send(request, accepted).await?;
        let warning = consistency_warning(&response);
        let value = self.decode(response).await?;
        Ok(Mutation { value, warning })
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let body = response.bytes().await.map_err(|e| self.failed(e.into()))?;

        serde_json::from_slice(&body).map_err(|e| self.failed(UpstreamError::Decode(e)))
    }

    fn failed(&self, e: UpstreamError) -> UpstreamError {
        tracing::warn!(upstream = self.name, error = %e, "Upstream call failed");
        e
    }
}

fn consistency_warning(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONSISTENCY_WARNING_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
