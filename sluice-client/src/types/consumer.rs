use serde::{Deserialize, Serialize};

use crate::types::destination::{DestinationConfig, WireDestination};
use crate::utils::{empty_as_none, empty_datetime_as_none};
use chrono::{DateTime, Utc};

/// Desired operational status of a stream consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumerStatus {
    Active,
    Disabled,
    Paused,
}

/// Change actions a consumer can capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Insert,
    Update,
    Delete,
}

/// Policy applied when the delivery buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSheddingPolicy {
    PauseOnFull,
    DiscardOnFull,
}

/// Encoding of timestamps in delivered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    Iso8601,
    UnixMicrosecond,
}

/// Schema/table include and exclude lists.
///
/// The control plane treats empty lists as "no restriction", so snapshots may
/// report empty arrays where the desired configuration had none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSourceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_schemas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_schemas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tables: Option<Vec<String>>,
}

/// One streamed table with optional grouping columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTableSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_column_names: Option<Vec<String>>,
}

/// Read-only operational status attached to a consumer snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireResourceStatus {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "empty_datetime_as_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_datetime_as_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_error: Option<String>,
}

impl WireResourceStatus {
    /// Whether the control plane actually reported status data.
    pub fn has_data(&self) -> bool {
        self.state.is_some() || self.created_at.is_some() || self.updated_at.is_some()
    }
}

/// Request body for creating or updating a stream consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsumerStatus>,
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<WireSourceFilter>,
    pub tables: Vec<WireTableSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionKind>>,
    pub destination: DestinationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_grouping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_shedding_policy: Option<LoadSheddingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<TimestampFormat>,
}

/// A stream consumer as reported by the control plane.
///
/// The destination stays in its flattened wire form here; folding it into a
/// [`DestinationConfig`] is the merge layer's job, since it needs the prior
/// persisted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerSnapshot {
    pub id: String,
    pub name: String,
    pub status: ConsumerStatus,
    pub connection_id: String,
    #[serde(default)]
    pub source: Option<WireSourceFilter>,
    pub tables: Vec<WireTableSpec>,
    #[serde(default)]
    pub actions: Vec<ActionKind>,
    pub destination: WireDestination,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub transform: Option<String>,
    #[serde(default)]
    pub enrichment: Option<String>,
    #[serde(default)]
    pub routing: Option<String>,
    #[serde(default)]
    pub message_grouping: bool,
    #[serde(default)]
    pub batch_size: u32,
    #[serde(default)]
    pub max_retry_count: Option<u32>,
    pub load_shedding_policy: LoadSheddingPolicy,
    pub timestamp_format: TimestampFormat,
    #[serde(default)]
    pub status_info: Option<WireResourceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_sentinel_fields_verbatim() {
        let snapshot: ConsumerSnapshot = serde_json::from_str(
            r#"{
                "id": "sink-1",
                "name": "orders-sink",
                "status": "active",
                "connection_id": "conn-1",
                "tables": [{"name": "public.orders"}],
                "actions": ["insert", "update"],
                "destination": {"type": "kafka", "hosts": "b:9092", "topic": "t"},
                "filter": "none",
                "message_grouping": true,
                "batch_size": 100,
                "load_shedding_policy": "pause_on_full",
                "timestamp_format": "iso8601"
            }"#,
        )
        .unwrap();

        // The wire layer does not normalize the sentinel; the merge layer does.
        assert_eq!(snapshot.filter.as_deref(), Some("none"));
        assert_eq!(snapshot.actions, vec![ActionKind::Insert, ActionKind::Update]);
        assert_eq!(snapshot.max_retry_count, None);
    }

    #[test]
    fn status_info_empty_strings_become_absent() {
        let status: WireResourceStatus = serde_json::from_str(
            r#"{"state": "", "created_at": "", "updated_at": "", "last_error": ""}"#,
        )
        .unwrap();

        assert!(!status.has_data());
        assert_eq!(status.state, None);
        assert_eq!(status.last_error, None);
    }
}
