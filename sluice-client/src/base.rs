use async_trait::async_trait;

use crate::error::ApiClientError;
use crate::types::{
    BackfillCreateRequest, BackfillSnapshot, BackfillUpdateRequest, ConnectionRequest,
    ConnectionSnapshot, ConsumerRequest, ConsumerSnapshot,
};

/// Per-resource CRUD calls against the remote control plane.
///
/// Every call is a single attempt; retry and backoff policy belong to the
/// caller. Get and update report a missing resource through
/// [`ApiClientError::NotFound`]; delete absorbs it, since deleting an already
/// deleted resource is a success.
#[async_trait]
pub trait ControlPlaneApi: Send + Sync {
    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError>;

    async fn get_connection(&self, id: &str) -> Result<ConnectionSnapshot, ApiClientError>;

    async fn update_connection(
        &self,
        id: &str,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError>;

    async fn delete_connection(&self, id: &str) -> Result<(), ApiClientError>;

    async fn create_consumer(
        &self,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError>;

    async fn get_consumer(&self, id: &str) -> Result<ConsumerSnapshot, ApiClientError>;

    async fn update_consumer(
        &self,
        id: &str,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError>;

    async fn delete_consumer(&self, id: &str) -> Result<(), ApiClientError>;

    /// Creates a backfill under a consumer identified by name or id.
    async fn create_backfill(
        &self,
        consumer: &str,
        request: &BackfillCreateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError>;

    async fn get_backfill(
        &self,
        consumer: &str,
        id: &str,
    ) -> Result<BackfillSnapshot, ApiClientError>;

    async fn update_backfill(
        &self,
        consumer: &str,
        id: &str,
        request: &BackfillUpdateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError>;

    async fn delete_backfill(&self, consumer: &str, id: &str) -> Result<(), ApiClientError>;

    async fn list_backfills(&self, consumer: &str) -> Result<Vec<BackfillSnapshot>, ApiClientError>;
}
