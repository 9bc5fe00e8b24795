use serde::{Deserialize, Serialize};
use sluice_config::SerializableSecretString;

/// Replication slot status reported and accepted by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Active,
    Disabled,
}

/// One replication slot entry, shared between requests and snapshots.
///
/// The `id` is assigned by the control plane on create; requests include it
/// only when updating an existing slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireReplicationSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub publication_name: String,
    pub slot_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
}

/// Nested primary-connection record used for replica topologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePrimaryConnection {
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

/// Request body for creating or updating a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRequest {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replication_slots: Vec<WireReplicationSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<WirePrimaryConnection>,
}

/// A connection as reported by the control plane.
///
/// Secrets are never part of the snapshot: the response's obfuscated password
/// placeholder is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(default)]
    pub use_local_tunnel: bool,
    #[serde(default)]
    pub pool_size: u32,
    #[serde(default)]
    pub queue_interval: u32,
    #[serde(default)]
    pub queue_target: u32,
    #[serde(default)]
    pub replication_slots: Vec<WireReplicationSlot>,
    #[serde(default)]
    pub primary: Option<WirePrimaryConnection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_fields() {
        let request = ConnectionRequest {
            name: "orders-db".to_string(),
            url: None,
            hostname: Some("db.internal".to_string()),
            port: Some(5432),
            database: Some("orders".to_string()),
            username: Some("replicator".to_string()),
            password: Some(SerializableSecretString::from("s3cr3t")),
            ssl: None,
            ipv6: None,
            replication_slots: vec![WireReplicationSlot {
                id: None,
                publication_name: "orders_pub".to_string(),
                slot_name: "orders_slot".to_string(),
                status: None,
            }],
            primary: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("ssl").is_none());
        assert!(json["replication_slots"][0].get("id").is_none());
        assert_eq!(json["password"], "s3cr3t");
    }

    #[test]
    fn snapshot_ignores_obfuscated_password() {
        let snapshot: ConnectionSnapshot = serde_json::from_str(
            r#"{
                "id": "conn-1",
                "name": "orders-db",
                "hostname": "db.internal",
                "port": 5432,
                "database": "orders",
                "username": "replicator",
                "password": "********",
                "ssl": true,
                "ipv6": false,
                "use_local_tunnel": false,
                "pool_size": 10,
                "queue_interval": 1000,
                "queue_target": 50,
                "replication_slots": [
                    {"id": "slot-1", "publication_name": "orders_pub", "slot_name": "orders_slot", "status": "active"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.id, "conn-1");
        assert_eq!(snapshot.replication_slots[0].id.as_deref(), Some("slot-1"));
        assert_eq!(
            snapshot.replication_slots[0].status,
            Some(SlotStatus::Active)
        );
    }
}
