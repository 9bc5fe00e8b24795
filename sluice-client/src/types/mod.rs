//! Wire requests and snapshots for the control-plane API.

mod backfill;
mod connection;
mod consumer;
mod destination;

pub use backfill::{
    BackfillCreateRequest, BackfillDesiredState, BackfillListResponse, BackfillRunState,
    BackfillSnapshot, BackfillUpdateRequest,
};
pub use connection::{
    ConnectionRequest, ConnectionSnapshot, SlotStatus, WirePrimaryConnection, WireReplicationSlot,
};
pub use consumer::{
    ActionKind, ConsumerRequest, ConsumerSnapshot, ConsumerStatus, LoadSheddingPolicy,
    TimestampFormat, WireResourceStatus, WireSourceFilter, WireTableSpec,
};
pub use destination::{
    DestinationConfig, DestinationDecodeError, DestinationKind, SaslMechanism, WireDestination,
};
