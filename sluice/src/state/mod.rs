//! Desired configurations and persisted states for each resource.
//!
//! Desired types are the caller-declared target; persisted types are the
//! merged representation the caller stores and diffs against. Both are plain
//! serde values: this crate never retains state between operations.

mod backfill;
mod connection;
mod consumer;

pub use backfill::{BackfillConfig, BackfillProgress, BackfillState};
pub use connection::{
    ConnectionConfig, ConnectionState, PrimaryConnectionConfig, PrimaryConnectionState,
    ReplicationSlotConfig, ReplicationSlotState,
};
pub use consumer::{
    ResourceStatus, SourceFilter, StreamConsumerConfig, StreamConsumerState, TableSpec,
};
