use sluice_client::ControlPlaneApi;
use sluice_client::types::{
    BackfillCreateRequest, BackfillDesiredState, BackfillSnapshot, BackfillUpdateRequest,
};
use tracing::warn;

use crate::concurrency::CancellationRx;
use crate::error::{ErrorKind, SluiceResult};
use crate::ident;
use crate::reconcile::{ReadOutcome, call_remote};
use crate::state::{BackfillConfig, BackfillProgress, BackfillState};

/// Reconciles backfills against the control plane.
///
/// A backfill is scoped under its parent consumer; the parent reference and
/// table are immutable after create. The only mutable field is the desired
/// state, and `cancelled` is terminal: asking for `active` afterwards is sent
/// as-is and the remote rejection is surfaced unchanged.
pub struct BackfillReconciler<C> {
    api: C,
}

impl<C> BackfillReconciler<C>
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

    /// Starts a backfill under the desired parent consumer.
    pub async fn create(
        &self,
        desired: &BackfillConfig,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<BackfillState> {
        let request = BackfillCreateRequest {
            table: desired.table.clone(),
        };

        let snapshot = call_remote(
            "create backfill",
            &desired.consumer,
            cancellation,
            self.api.create_backfill(&desired.consumer, &request),
        )
        .await?;

        Ok(fold_snapshot(snapshot, Some(&desired.consumer)))
    }

    /// Refreshes the persisted state from the control plane.
    pub async fn read(
        &self,
        prior: &BackfillState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<ReadOutcome<BackfillState>> {
        let snapshot = match call_remote(
            "read backfill",
            &prior.id,
            cancellation,
            self.api.get_backfill(&prior.consumer, &prior.id),
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                warn!(id = %prior.id, "backfill not found, removing from state");
                return Ok(ReadOutcome::Removed);
            }
            Err(error) => return Err(error),
        };

        Ok(ReadOutcome::Live(fold_snapshot(
            snapshot,
            Some(&prior.consumer),
        )))
    }

    /// Transmits the desired state, keyed by the prior state's identity.
    pub async fn update(
        &self,
        desired: &BackfillConfig,
        prior: &BackfillState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<BackfillState> {
        let request = BackfillUpdateRequest {
            state: desired.state.unwrap_or(BackfillDesiredState::Active),
        };

        let snapshot = call_remote(
            "update backfill",
            &prior.id,
            cancellation,
            self.api.update_backfill(&prior.consumer, &prior.id, &request),
        )
        .await?;

        Ok(fold_snapshot(snapshot, Some(&prior.consumer)))
    }

    /// Deletes the backfill; deleting an already-missing one succeeds.
    pub async fn delete(
        &self,
        prior: &BackfillState,
        cancellation: &mut CancellationRx,
    ) -> SluiceResult<()> {
        call_remote(
            "delete backfill",
            &prior.id,
            cancellation,
            self.api.delete_backfill(&prior.consumer, &prior.id),
        )
        .await
    }
}

impl<C> BackfillReconciler<C> {
    /// Decodes a compound import identifier into (consumer reference,
    /// backfill id). Purely local; a malformed identifier never reaches the
    /// network.
    pub fn import_id(raw: &str) -> SluiceResult<(String, String)> {
        ident::decode(raw)
    }
}

fn fold_snapshot(snapshot: BackfillSnapshot, caller_reference: Option<&str>) -> BackfillState {
    // The caller-supplied reference drives API paths; fall back to the name
    // reported by the control plane only when the caller has none.
    let consumer = caller_reference
        .filter(|reference| !reference.is_empty())
        .map(str::to_string)
        .or(snapshot.consumer)
        .unwrap_or_default();

    BackfillState {
        id: snapshot.id,
        consumer,
        table: snapshot.table,
        state: snapshot.state,
        progress: BackfillProgress {
            state: snapshot.state,
            inserted_at: snapshot.inserted_at,
            updated_at: snapshot.updated_at,
            canceled_at: snapshot.canceled_at,
            completed_at: snapshot.completed_at,
            rows_ingested_count: snapshot.rows_ingested_count,
            rows_initial_count: snapshot.rows_initial_count,
            rows_processed_count: snapshot.rows_processed_count,
            sort_column: snapshot.sort_column,
        },
    }
}
