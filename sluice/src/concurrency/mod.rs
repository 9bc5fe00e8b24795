//! Cooperative cancellation primitives for reconciler operations.

mod signal;

pub use signal::{CancellationRx, CancellationTx, cancelled, create_cancellation};
