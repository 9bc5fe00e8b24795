use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sluice_config::SerializableSecretString;
use sluice_config::shared::ControlPlaneConfig;
use tracing::{debug, info, warn};

use crate::base::ControlPlaneApi;
use crate::error::ApiClientError;
use crate::types::{
    BackfillCreateRequest, BackfillListResponse, BackfillSnapshot, BackfillUpdateRequest,
    ConnectionRequest, ConnectionSnapshot, ConsumerRequest, ConsumerSnapshot,
};

/// HTTP-based implementation of [`ControlPlaneApi`].
///
/// Authenticates every request with the configured bearer token and performs
/// exactly one attempt per operation.
#[derive(Debug, Clone)]
pub struct HttpControlPlaneClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SerializableSecretString,
}

impl HttpControlPlaneClient {
    /// Creates a new [`HttpControlPlaneClient`] from the control-plane settings.
    pub fn new(config: &ControlPlaneConfig) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("sluice-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<reqwest::Response, ApiClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "sending control-plane request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(self.api_key.expose_secret())
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        debug!(status = %response.status(), "received control-plane response");

        Ok(response)
    }

    /// Decodes a response body, mapping 404 and error statuses to typed errors.
    async fn decode<T>(path: &str, response: reqwest::Response) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiClientError::NotFound {
                path: path.to_string(),
            });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ApiClientError::Api { status, body });
        }

        serde_json::from_str(&body).map_err(ApiClientError::Deserialize)
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::decode(path, response).await
    }

    async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Some(body)).await?;
        Self::decode(path, response).await
    }

    /// Issues a delete, treating an already-missing resource as success.
    async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let response = self.send(Method::DELETE, path, None::<&()>).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            warn!(%path, "resource already deleted");
            return Ok(());
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await?;
            return Err(ApiClientError::Api { status, body });
        }

        Ok(())
    }
}

fn connection_path(id: &str) -> String {
    format!("/v1/connections/{id}")
}

fn consumer_path(id: &str) -> String {
    format!("/v1/consumers/{id}")
}

fn backfills_path(consumer: &str) -> String {
    format!("/v1/consumers/{consumer}/backfills")
}

fn backfill_path(consumer: &str, id: &str) -> String {
    format!("/v1/consumers/{consumer}/backfills/{id}")
}

#[async_trait]
impl ControlPlaneApi for HttpControlPlaneClient {
    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError> {
        let snapshot: ConnectionSnapshot = self
            .send_json(Method::POST, "/v1/connections", request)
            .await?;
        info!(id = %snapshot.id, name = %snapshot.name, "created connection");
        Ok(snapshot)
    }

    async fn get_connection(&self, id: &str) -> Result<ConnectionSnapshot, ApiClientError> {
        self.get_json(&connection_path(id)).await
    }

    async fn update_connection(
        &self,
        id: &str,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError> {
        let snapshot: ConnectionSnapshot = self
            .send_json(Method::PUT, &connection_path(id), request)
            .await?;
        info!(id = %snapshot.id, "updated connection");
        Ok(snapshot)
    }

    async fn delete_connection(&self, id: &str) -> Result<(), ApiClientError> {
        self.delete(&connection_path(id)).await?;
        info!(%id, "deleted connection");
        Ok(())
    }

    async fn create_consumer(
        &self,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError> {
        let snapshot: ConsumerSnapshot = self
            .send_json(Method::POST, "/v1/consumers", request)
            .await?;
        info!(id = %snapshot.id, name = %snapshot.name, "created stream consumer");
        Ok(snapshot)
    }

    async fn get_consumer(&self, id: &str) -> Result<ConsumerSnapshot, ApiClientError> {
        self.get_json(&consumer_path(id)).await
    }

    async fn update_consumer(
        &self,
        id: &str,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError> {
        let snapshot: ConsumerSnapshot = self
            .send_json(Method::PUT, &consumer_path(id), request)
            .await?;
        info!(id = %snapshot.id, "updated stream consumer");
        Ok(snapshot)
    }

    async fn delete_consumer(&self, id: &str) -> Result<(), ApiClientError> {
        self.delete(&consumer_path(id)).await?;
        info!(%id, "deleted stream consumer");
        Ok(())
    }

    async fn create_backfill(
        &self,
        consumer: &str,
        request: &BackfillCreateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        let snapshot: BackfillSnapshot = self
            .send_json(Method::POST, &backfills_path(consumer), request)
            .await?;
        info!(id = %snapshot.id, %consumer, "created backfill");
        Ok(snapshot)
    }

    async fn get_backfill(
        &self,
        consumer: &str,
        id: &str,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        self.get_json(&backfill_path(consumer, id)).await
    }

    async fn update_backfill(
        &self,
        consumer: &str,
        id: &str,
        request: &BackfillUpdateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        let snapshot: BackfillSnapshot = self
            .send_json(Method::PATCH, &backfill_path(consumer, id), request)
            .await?;
        info!(id = %snapshot.id, "updated backfill");
        Ok(snapshot)
    }

    async fn delete_backfill(&self, consumer: &str, id: &str) -> Result<(), ApiClientError> {
        self.delete(&backfill_path(consumer, id)).await?;
        info!(%id, "deleted backfill");
        Ok(())
    }

    async fn list_backfills(
        &self,
        consumer: &str,
    ) -> Result<Vec<BackfillSnapshot>, ApiClientError> {
        let list: BackfillListResponse = self.get_json(&backfills_path(consumer)).await?;
        Ok(list.data)
    }
}
