use serde::{Deserialize, Serialize};
use sluice_client::types::SlotStatus;
use sluice_config::SerializableSecretString;

/// One desired replication slot.
///
/// `id` is only set when the caller adopted an already-created slot; new
/// slots are declared without one and receive an id from the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSlotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub publication_name: String,
    pub slot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
}

/// Desired nested primary-connection settings for replica topologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryConnectionConfig {
    pub hostname: String,
    pub database: String,
    pub username: String,
    pub password: SerializableSecretString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
}

/// Desired configuration for a connection.
///
/// Connection parameters are given either as a single `url` or as discrete
/// host/credential fields; the two forms are mutually substitutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    pub replication_slots: Vec<ReplicationSlotConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryConnectionConfig>,
}

/// One replication slot in the persisted state, with its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationSlotState {
    pub id: String,
    pub publication_name: String,
    pub slot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
}

/// Persisted nested primary-connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryConnectionState {
    pub hostname: String,
    pub database: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SerializableSecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
}

/// Persisted state of a connection.
///
/// `url` and `password` are never returned by the control plane and are
/// carried forward from the desired configuration; everything else reflects
/// the latest snapshot, including server-computed tuning fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<SerializableSecretString>,
    pub hostname: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SerializableSecretString>,
    pub ssl: bool,
    pub ipv6: bool,
    pub use_local_tunnel: bool,
    pub pool_size: u32,
    pub queue_interval: u32,
    pub queue_target: u32,
    pub replication_slots: Vec<ReplicationSlotState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryConnectionState>,
}
