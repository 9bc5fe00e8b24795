//! Resource reconcilers: create/read/update/delete/import per resource type.
//!
//! Each operation builds a wire request from the desired configuration, makes
//! exactly one call to the control plane, and folds the response into a new
//! persisted state through the normalize/preserve/destination merge pipeline.
//! Operations are pure functions of their inputs plus that one round trip;
//! nothing is retained between invocations and nothing is retried here.

mod backfill;
mod connection;
mod consumer;

pub use backfill::BackfillReconciler;
pub use connection::ConnectionReconciler;
pub use consumer::StreamConsumerReconciler;

use std::future::Future;

use sluice_client::ApiClientError;

use crate::concurrency::{CancellationRx, cancelled};
use crate::error::{ErrorKind, SluiceError, SluiceResult};
use crate::sluice_error;

/// Outcome of a read operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    /// The resource still exists; the merged state replaces the prior one.
    Live(T),
    /// The control plane no longer knows the resource; the caller must drop
    /// it from its store. This is not a failure.
    Removed,
}

impl<T> ReadOutcome<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, ReadOutcome::Removed)
    }
}

/// Runs one collaborator call under the caller's cancellation signal.
///
/// If the signal fires first, the call is abandoned and the operation fails
/// with [`ErrorKind::OperationCanceled`] before any merging happens. Errors
/// are annotated with the operation and resource that failed.
pub(crate) async fn call_remote<T, F>(
    operation: &'static str,
    resource: &str,
    cancellation: &mut CancellationRx,
    call: F,
) -> SluiceResult<T>
where
    F: Future<Output = Result<T, ApiClientError>>,
{
    tokio::select! {
        _ = cancelled(cancellation) => Err(sluice_error!(
            ErrorKind::OperationCanceled,
            "operation cancelled by caller",
            format!("{operation} `{resource}` aborted before completion")
        )),
        result = call => result.map_err(|error| {
            let detail = format!("{operation} `{resource}` failed: {error}");
            SluiceError::from(error).with_detail(detail)
        }),
    }
}
