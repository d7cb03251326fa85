//! Client for the primary device service

use std::time::Duration;

use reqwest::StatusCode;

use crate::models::{CreateDeviceRequest, Device, UpdateDeviceRequest};

use super::{consistency_warning, Mutation, Upstream, UpstreamError};

/// Translates gateway operations into calls against the device service.
/// Device ids are passed through as opaque path segments.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    upstream: Upstream,
}

impl DeviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self {
            upstream: Upstream::new("device-api", base_url, timeout)?,
        })
    }

    /// GET /devices?houseId=
    pub async fn list_by_house(&self, house_id: &str) -> Result<Vec<Device>, UpstreamError> {
        let mut url = self.upstream.url(&["devices"])?;
        url.query_pairs_mut().append_pair("houseId", house_id);

        let request = self.upstream.http_client.get(url);
        self.upstream.send_json(request, &[StatusCode::OK]).await
    }

    /// GET /devices/:id
    pub async fn get(&self, id: &str) -> Result<Device, UpstreamError> {
        let url = self.upstream.url(&["devices", id])?;

        let request = self.upstream.http_client.get(url);
        self.upstream.send_json(request, &[StatusCode::OK]).await
    }

    /// POST /devices
    pub async fn create(
        &self,
        req: &CreateDeviceRequest,
    ) -> Result<Mutation<Device>, UpstreamError> {
        let url = self.upstream.url(&["devices"])?;

        let request = self.upstream.http_client.post(url).json(req);
        self.upstream
            .send_mutation(request, &[StatusCode::OK, StatusCode::CREATED])
            .await
    }

    /// PUT /devices/:id
    pub async fn update(
        &self,
        id: &str,
        req: &UpdateDeviceRequest,
    ) -> Result<Mutation<Device>, UpstreamError> {
        let url = self.upstream.url(&["devices", id])?;

        let request = self.upstream.http_client.put(url).json(req);
        self.upstream.send_mutation(request, &[StatusCode::OK]).await
    }

    /// DELETE /devices/:id
    pub async fn delete(&self, id: &str) -> Result<Mutation<()>, UpstreamError> {
        let url = self.upstream.url(&["devices", id])?;

        let request = self.upstream.http_client.delete(url);
        let response = self.upstream.send(request, &[StatusCode::OK]).await?;
        Ok(Mutation {
            value: (),
            warning: consistency_warning(&response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_device, serve, unused_base_url};
    use axum::{
        extract::{Path, Query},
        http::StatusCode as AxumStatus,
        routing::get,
        Json, Router,
    };
    use std::collections::HashMap;

    fn client(base_url: &str) -> DeviceClient {
        DeviceClient::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_house_id() {
        let app = Router::new().route(
            "/devices",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let house: i32 = params["houseId"].parse().unwrap();
                let mut device = sample_device(1);
                device.house_id = house;
                Json(vec![device])
            }),
        );
        let base = serve(app).await;

        let devices = client(&base).list_by_house("7").await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].house_id, 7);
    }

    #[tokio::test]
    async fn test_create_accepts_201() {
        let app = Router::new().route(
            "/devices",
            axum::routing::post(|Json(req): Json<CreateDeviceRequest>| async move {
                let mut device = sample_device(3);
                device.serial_number = req.serial_number;
                (AxumStatus::CREATED, Json(device))
            }),
        );
        let base = serve(app).await;

        let req = CreateDeviceRequest {
            serial_number: "SN-X".to_string(),
            device_model_id: 1,
            house_id: 2,
            name: "Plug".to_string(),
        };
        let created = client(&base).create(&req).await.unwrap();
        assert_eq!(created.value.id, 3);
        assert_eq!(created.value.serial_number, "SN-X");
        assert!(created.warning.is_none());
    }

    #[tokio::test]
    async fn test_mutation_keeps_consistency_warning() {
        let app = Router::new().route(
            "/devices/:id",
            axum::routing::put(|Path(id): Path<i32>| async move {
                (
                    [("x-consistency-warning", "device 4: clearing attributes failed: boom")],
                    Json(sample_device(id)),
                )
            })
            .delete(|| async {
                (
                    [("x-consistency-warning", "device 4: clearing attributes failed: boom")],
                    "Device deleted successfully",
                )
            }),
        );
        let base = serve(app).await;

        let req = UpdateDeviceRequest {
            serial_number: String::new(),
            device_model_id: 1,
            house_id: 2,
            name: String::new(),
        };
        let updated = client(&base).update("4", &req).await.unwrap();
        assert_eq!(updated.value.id, 4);
        assert_eq!(
            updated.warning.as_deref(),
            Some("device 4: clearing attributes failed: boom")
        );

        let deleted = client(&base).delete("4").await.unwrap();
        assert!(deleted.warning.is_some());
    }

    #[tokio::test]
    async fn test_get_rejects_201() {
        let app = Router::new().route(
            "/devices/:id",
            get(|Path(id): Path<i32>| async move { (AxumStatus::CREATED, Json(sample_device(id))) }),
        );
        let base = serve(app).await;

        let result = client(&base).get("4").await;
        assert!(matches!(result, Err(UpstreamError::Status(201))));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let base = serve(Router::new()).await;

        let result = client(&base).get("4").await;
        assert!(matches!(result, Err(UpstreamError::Status(404))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let app = Router::new().route("/devices/:id", get(|| async { "not json" }));
        let base = serve(app).await;

        let result = client(&base).get("4").await;
        assert!(matches!(result, Err(UpstreamError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let result = client(&unused_base_url().await).get("4").await;
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let app = Router::new().route(
            "/devices/:id",
            axum::routing::delete(|| async { "Device deleted successfully" }),
        );
        let base = serve(app).await;

        assert!(client(&base).delete("4").await.is_ok());
    }
}
