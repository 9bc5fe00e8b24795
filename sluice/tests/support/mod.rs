#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sluice_client::types::{
    BackfillCreateRequest, BackfillSnapshot, BackfillUpdateRequest, ConnectionRequest,
    ConnectionSnapshot, ConsumerRequest, ConsumerSnapshot,
};
use sluice_client::{ApiClientError, ControlPlaneApi};

/// In-memory control plane with scripted snapshots.
///
/// Each operation hands back the configured snapshot and records the request
/// it received, so tests can assert on both directions of the merge pipeline.
#[derive(Default)]
pub struct MockControlPlane {
    pub connection: Mutex<Option<ConnectionSnapshot>>,
    pub consumer: Mutex<Option<ConsumerSnapshot>>,
    pub backfill: Mutex<Option<BackfillSnapshot>>,

    /// When set, update calls fail with this (status, body) pair.
    pub fail_updates_with: Mutex<Option<(u16, String)>>,
    /// When set, get calls never resolve; used to exercise cancellation.
    pub hang_reads: AtomicBool,

    pub last_connection_request: Mutex<Option<ConnectionRequest>>,
    pub last_consumer_request: Mutex<Option<ConsumerRequest>>,
    pub last_backfill_create: Mutex<Option<BackfillCreateRequest>>,
    pub last_backfill_update: Mutex<Option<BackfillUpdateRequest>>,
}

impl MockControlPlane {
    pub fn with_connection(snapshot: ConnectionSnapshot) -> Self {
        let mock = Self::default();
        *mock.connection.lock().unwrap() = Some(snapshot);
        mock
    }

    pub fn with_consumer(snapshot: ConsumerSnapshot) -> Self {
        let mock = Self::default();
        *mock.consumer.lock().unwrap() = Some(snapshot);
        mock
    }

    pub fn with_backfill(snapshot: BackfillSnapshot) -> Self {
        let mock = Self::default();
        *mock.backfill.lock().unwrap() = Some(snapshot);
        mock
    }

    fn not_found(path: String) -> ApiClientError {
        ApiClientError::NotFound { path }
    }

    fn scripted_failure(&self) -> Option<ApiClientError> {
        self.fail_updates_with
            .lock()
            .unwrap()
            .clone()
            .map(|(status, body)| ApiClientError::Api {
                status: reqwest::StatusCode::from_u16(status).unwrap(),
                body,
            })
    }

    async fn maybe_hang(&self) {
        if self.hang_reads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl ControlPlaneApi for MockControlPlane {
    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError> {
        *self.last_connection_request.lock().unwrap() = Some(request.clone());
        Ok(self
            .connection
            .lock()
            .unwrap()
            .clone()
            .expect("mock connection snapshot not configured"))
    }

    async fn get_connection(&self, id: &str) -> Result<ConnectionSnapshot, ApiClientError> {
        self.maybe_hang().await;
        self.connection
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/connections/{id}")))
    }

    async fn update_connection(
        &self,
        id: &str,
        request: &ConnectionRequest,
    ) -> Result<ConnectionSnapshot, ApiClientError> {
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        *self.last_connection_request.lock().unwrap() = Some(request.clone());
        self.connection
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/connections/{id}")))
    }

    async fn delete_connection(&self, _id: &str) -> Result<(), ApiClientError> {
        // Mirrors the HTTP client contract: deleting a missing resource
        // succeeds.
        Ok(())
    }

    async fn create_consumer(
        &self,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError> {
        *self.last_consumer_request.lock().unwrap() = Some(request.clone());
        Ok(self
            .consumer
            .lock()
            .unwrap()
            .clone()
            .expect("mock consumer snapshot not configured"))
    }

    async fn get_consumer(&self, id: &str) -> Result<ConsumerSnapshot, ApiClientError> {
        self.maybe_hang().await;
        self.consumer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/consumers/{id}")))
    }

    async fn update_consumer(
        &self,
        id: &str,
        request: &ConsumerRequest,
    ) -> Result<ConsumerSnapshot, ApiClientError> {
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        *self.last_consumer_request.lock().unwrap() = Some(request.clone());
        self.consumer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/consumers/{id}")))
    }

    async fn delete_consumer(&self, _id: &str) -> Result<(), ApiClientError> {
        Ok(())
    }

    async fn create_backfill(
        &self,
        _consumer: &str,
        request: &BackfillCreateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        *self.last_backfill_create.lock().unwrap() = Some(request.clone());
        Ok(self
            .backfill
            .lock()
            .unwrap()
            .clone()
            .expect("mock backfill snapshot not configured"))
    }

    async fn get_backfill(
        &self,
        consumer: &str,
        id: &str,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        self.maybe_hang().await;
        self.backfill
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/consumers/{consumer}/backfills/{id}")))
    }

    async fn update_backfill(
        &self,
        consumer: &str,
        id: &str,
        request: &BackfillUpdateRequest,
    ) -> Result<BackfillSnapshot, ApiClientError> {
        if let Some(error) = self.scripted_failure() {
            return Err(error);
        }
        *self.last_backfill_update.lock().unwrap() = Some(request.clone());
        self.backfill
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Self::not_found(format!("/v1/consumers/{consumer}/backfills/{id}")))
    }

    async fn delete_backfill(&self, _consumer: &str, _id: &str) -> Result<(), ApiClientError> {
        Ok(())
    }

    async fn list_backfills(
        &self,
        _consumer: &str,
    ) -> Result<Vec<BackfillSnapshot>, ApiClientError> {
        Ok(self.backfill.lock().unwrap().clone().into_iter().collect())
    }
}
