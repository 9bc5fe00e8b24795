//! Cancellation signaling built on tokio's watch channels.
//!
//! A reconciler operation observes the receiver while its network call is in
//! flight; when the caller fires the signal, the operation aborts before any
//! state is merged.

use tokio::sync::watch;

/// Transmitter side of a cancellation signal channel.
///
/// Firing the signal (sending `()`) requests that in-flight operations abort.
pub type CancellationTx = watch::Sender<()>;

/// Receiver side of a cancellation signal channel.
pub type CancellationRx = watch::Receiver<()>;

/// Creates a new cancellation signal channel.
///
/// The channel starts unsignaled; receivers only observe sends that happen
/// after they were created.
pub fn create_cancellation() -> (CancellationTx, CancellationRx) {
    let (tx, rx) = watch::channel(());
    (tx, rx)
}

/// Resolves when the cancellation signal fires.
///
/// A dropped transmitter means the operation can no longer be cancelled, so
/// the future parks forever instead of resolving.
pub async fn cancelled(rx: &mut CancellationRx) {
    if rx.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_after_send() {
        let (tx, mut rx) = create_cancellation();
        tx.send(()).unwrap();
        cancelled(&mut rx).await;
    }

    #[tokio::test]
    async fn dropped_sender_never_fires() {
        let (tx, mut rx) = create_cancellation();
        drop(tx);

        let result = tokio::time::timeout(Duration::from_millis(20), cancelled(&mut rx)).await;
        assert!(result.is_err());
    }
}
