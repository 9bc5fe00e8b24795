use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sluice_client::types::{
    ActionKind, ConsumerStatus, DestinationConfig, LoadSheddingPolicy, TimestampFormat,
};

/// Schema/table include and exclude lists; absent lists mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_schemas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_schemas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tables: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tables: Option<Vec<String>>,
}

impl SourceFilter {
    /// Whether any list carries a restriction.
    pub fn is_empty(&self) -> bool {
        self.include_schemas.is_none()
            && self.exclude_schemas.is_none()
            && self.include_tables.is_none()
            && self.exclude_tables.is_none()
    }
}

/// One streamed table with optional grouping columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_column_names: Option<Vec<String>>,
}

/// Read-only operational status of a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Desired configuration for a stream consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConsumerConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsumerStatus>,
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,
    pub tables: Vec<TableSpec>,
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

/// Persisted state of a stream consumer.
///
/// Tunables the control plane defaults are concrete here, so a later diff
/// against the desired configuration sees the authoritative values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConsumerState {
    pub id: String,
    pub name: String,
    pub status: ConsumerStatus,
    pub connection_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,
    pub tables: Vec<TableSpec>,
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
    pub message_grouping: bool,
    pub batch_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry_count: Option<u32>,
    pub load_shedding_policy: LoadSheddingPolicy,
    pub timestamp_format: TimestampFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_info: Option<ResourceStatus>,
}
