//! State reconciliation for declaratively managed change-stream resources.
//!
//! Folds control-plane snapshots into persisted state without drift: sentinel
//! values normalize to absent, write-only secrets are carried forward, and the
//! destination union never leaks fields across kinds.

pub mod concurrency;
pub mod destination;
pub mod error;
pub mod ident;
mod macros;
pub mod normalize;
pub mod reconcile;
pub mod secrets;
pub mod state;

pub use error::{ErrorKind, SluiceError, SluiceResult};
