use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sluice_client::types::{BackfillDesiredState, BackfillRunState};

/// Desired configuration for a backfill.
///
/// `consumer` references the parent by name or id; both are accepted by the
/// control plane. `table` may be omitted when the parent streams a single
/// table. Both are immutable after create; changing either means destroying
/// and recreating the backfill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillConfig {
    pub consumer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<BackfillDesiredState>,
}

/// Read-only progress record of a backfill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillProgress {
    pub state: BackfillRunState,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub rows_ingested_count: u64,
    pub rows_initial_count: u64,
    pub rows_processed_count: u64,
    pub sort_column: String,
}

/// Persisted state of a backfill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillState {
    pub id: String,
    /// Parent reference as supplied by the caller; used for API paths.
    pub consumer: String,
    pub table: String,
    /// Last observed lifecycle state.
    pub state: BackfillRunState,
    pub progress: BackfillProgress,
}
