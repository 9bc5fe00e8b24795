use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::empty_datetime_as_none;

/// Lifecycle state of a backfill as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillRunState {
    Active,
    Completed,
    Cancelled,
}

/// User-requestable backfill state.
///
/// `Cancelled` is terminal intent; the control plane rejects transitions back
/// to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillDesiredState {
    Active,
    Cancelled,
}

/// Request body for creating a backfill.
///
/// `table` may be omitted when the parent consumer streams a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillCreateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

/// Request body for updating a backfill's desired state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillUpdateRequest {
    pub state: BackfillDesiredState,
}

/// A backfill as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillSnapshot {
    pub id: String,
    pub state: BackfillRunState,
    pub table: String,
    /// Name of the parent consumer as known by the control plane.
    #[serde(default)]
    pub consumer: Option<String>,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "empty_datetime_as_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_datetime_as_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rows_ingested_count: u64,
    #[serde(default)]
    pub rows_initial_count: u64,
    #[serde(default)]
    pub rows_processed_count: u64,
    #[serde(default)]
    pub sort_column: String,
}

/// Envelope for the backfill list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillListResponse {
    pub data: Vec<BackfillSnapshot>,
}
