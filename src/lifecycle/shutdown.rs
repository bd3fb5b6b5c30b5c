//! Shutdown signalling for background loops.

use tokio::sync::broadcast;

/// One-shot stop signal shared by a background loop and its owner.
///
/// Receivers also wake when the coordinator is dropped, so a loop never
/// outlives the handle that started it.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe before spawning the task that should observe the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every current subscriber.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of loops still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
