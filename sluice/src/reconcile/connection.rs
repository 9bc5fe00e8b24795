use sluice_client::ControlPlaneApi;
use sluice_client::types::{
    ConnectionRequest, ConnectionSnapshot, WirePrimaryConnection, WireReplicationSlot,
};
use sluice_config::SerializableSecretString;
use tracing::warn;

use crate::concurrency::CancellationRx;
use crate::error::{ErrorKind, SluiceResult};
use crate::reconcile::{ReadOutcome, call_remote};
use crate::state::{
    ConnectionConfig, ConnectionState, PrimaryConnectionState, ReplicationSlotConfig,
    ReplicationSlotState,
};
use crate::{bail, secrets};

/// Secrets the control plane never returns, sourced from the desired
/// configuration on create and from the prior state afterwards.
struct PriorSecrets<'a> {
    url: Option<&'a SerializableSecretString>,
    password: Option<&'a SerializableSecretString>,
    primary_password: Option<&'a SerializableSecretString>,
}

impl<'a> PriorSecrets<'a> {
    fn from_config(config: &'a ConnectionConfig) -> Self {
        Self {
            url: config.url.as_ref(),
            password: config.password.as_ref(),
            primary_password: config.primary.as_ref().map(|primary| &primary.password),
        }
    }

    fn from_state(state: &'a ConnectionState) -> Self {
        Self {
            url: state.url.as_ref(),
            password: state.password.as_ref(),
            primary_password: state
                .primary
                .as_ref()
                .and_then(|primary| primary.password.as_ref()),
        }
    }
}

/// Reconciles connections against the control plane.
pub struct ConnectionReconciler<C> {
    api: C,
}

impl<C> ConnectionReconciler<C>
where
    C: ControlPlaneApi,
{
    pub fn new(api: C) -> Self {
        Self { api }
    }

    /// Returns the underlying collaborator.
    pub fn api(&self) -> &C {
        &self.api
    }

    /// Creates the connection and folds the response seeded with the desired
    /// configuration, so declared secrets survive the first round trip.
    pub async fn create(
        &self,
        desired: &ConnectionConfig,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<ConnectionState> {
        validate(desired)?;

        let request = build_request(desired, None);
        let snapshot = call_remote(
            "create connection",
            &desired.name,
            cancellation,
            self.api.create_connection(&request),
        )
        .await?;

        Ok(fold_snapshot(snapshot, PriorSecrets::from_config(desired)))
    }

    /// Refreshes the persisted state from the control plane.
    pub async fn read(
        &self,
        prior: &ConnectionState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<ReadOutcome<ConnectionState>> {
        let snapshot = match call_remote(
            "read connection",
            &prior.id,
            cancellation,
            self.api.get_connection(&prior.id),
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                warn!(id = %prior.id, "connection not found, removing from state");
                return Ok(ReadOutcome::Removed);
            }
            Err(error) => return Err(error),
        };

        Ok(ReadOutcome::Live(fold_snapshot(
            snapshot,
            PriorSecrets::from_state(prior),
        )))
    }

    /// Updates the connection keyed by the prior state's identity.
    ///
    /// Desired slots without an id adopt the id of the prior slot with the
    /// same `slot_name`; unmatched entries are sent without one and created
    /// as new slots by the control plane.
    pub async fn update(
        &self,
        desired: &ConnectionConfig,
        prior: &ConnectionState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<ConnectionState> {
        validate(desired)?;

        let request = build_request(desired, Some(&prior.replication_slots));
        let snapshot = call_remote(
            "update connection",
            &prior.id,
            cancellation,
            self.api.update_connection(&prior.id, &request),
        )
        .await?;

        Ok(fold_snapshot(snapshot, PriorSecrets::from_config(desired)))
    }

    /// Deletes the connection; deleting an already-missing one succeeds.
    pub async fn delete(
        &self,
        prior: &ConnectionState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<()> {
        call_remote(
            "delete connection",
            &prior.id,
            cancellation,
            self.api.delete_connection(&prior.id),
        )
        .await
    }
}

impl<C> ConnectionReconciler<C> {
    /// Validates an external identifier for import. The identifier is the
    /// connection's own opaque id.
    pub fn import_id(raw: &str) -> SluiceResult<String> {
        if raw.trim().is_empty() {
            bail!(
                ErrorKind::InvalidIdentifier,
                "invalid connection import identifier",
                "expected a non-empty connection id"
            );
        }
        Ok(raw.to_string())
    }
}

fn validate(desired: &ConnectionConfig) -> SluiceResult<()> {
    if desired.name.trim().is_empty() {
        bail!(
            ErrorKind::ValidationError,
            "invalid connection configuration",
            "`name` must not be empty"
        );
    }

    if desired.replication_slots.is_empty() {
        bail!(
            ErrorKind::ValidationError,
            "invalid connection configuration",
            format!(
                "connection `{}` must declare at least one replication slot",
                desired.name
            )
        );
    }

    Ok(())
}

fn build_request(
    desired: &ConnectionConfig,
    prior_slots: Option<&[ReplicationSlotState]>,
) -> ConnectionRequest {
    ConnectionRequest {
        name: desired.name.clone(),
        url: desired.url.clone(),
        hostname: desired.hostname.clone(),
        port: desired.port,
        database: desired.database.clone(),
        username: desired.username.clone(),
        password: desired.password.clone(),
        ssl: desired.ssl,
        ipv6: desired.ipv6,
        replication_slots: request_slots(&desired.replication_slots, prior_slots),
        primary: desired.primary.as_ref().map(|primary| WirePrimaryConnection {
            hostname: primary.hostname.clone(),
            database: primary.database.clone(),
            username: primary.username.clone(),
            password: Some(primary.password.clone()),
            port: primary.port,
            ssl: primary.ssl,
        }),
    }
}

fn request_slots(
    desired: &[ReplicationSlotConfig],
    prior: Option<&[ReplicationSlotState]>,
) -> Vec<WireReplicationSlot> {
    desired
        .iter()
        .map(|slot| {
            let id = slot.id.clone().or_else(|| {
                prior.and_then(|prior| {
                    prior
                        .iter()
                        .find(|candidate| candidate.slot_name == slot.slot_name)
                        .map(|candidate| candidate.id.clone())
                })
            });

            WireReplicationSlot {
                id,
                publication_name: slot.publication_name.clone(),
                slot_name: slot.slot_name.clone(),
                status: slot.status,
            }
        })
        .collect()
}

fn fold_snapshot(snapshot: ConnectionSnapshot, prior: PriorSecrets<'_>) -> ConnectionState {
    let primary = snapshot.primary.map(|wire| PrimaryConnectionState {
        hostname: wire.hostname,
        database: wire.database,
        username: wire.username,
        password: secrets::preserve(wire.password, prior.primary_password),
        port: wire.port,
        ssl: wire.ssl,
    });

    ConnectionState {
        id: snapshot.id,
        name: snapshot.name,
        url: prior.url.cloned(),
        hostname: snapshot.hostname,
        port: snapshot.port,
        database: snapshot.database,
        username: snapshot.username,
        password: prior.password.cloned(),
        ssl: snapshot.ssl,
        ipv6: snapshot.ipv6,
        use_local_tunnel: snapshot.use_local_tunnel,
        pool_size: snapshot.pool_size,
        queue_interval: snapshot.queue_interval,
        queue_target: snapshot.queue_target,
        replication_slots: snapshot
            .replication_slots
            .into_iter()
            .map(|slot| ReplicationSlotState {
                id: slot.id.unwrap_or_default(),
                publication_name: slot.publication_name,
                slot_name: slot.slot_name,
                status: slot.status,
            })
            .collect(),
        primary,
    }
}
