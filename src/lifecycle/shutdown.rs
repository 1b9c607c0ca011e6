//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_termination;

/// Fans one stop signal out to the server and any background tasks.
///
/// Clones share the same channel, so a clone can be handed to the task
/// that waits for OS signals while the original keeps subscribing.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop everything subscribed so far. Returns false when nobody listens.
    pub fn trigger(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Trigger on Ctrl+C or SIGTERM.
    pub fn trigger_on_termination(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            wait_for_termination().await;
            if !shutdown.trigger() {
                tracing::warn!("Termination signal received with no running server");
            }
        })
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut reloader = shutdown.clone().subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        assert!(shutdown.trigger());
        assert!(server.recv().await.is_ok());
        assert!(reloader.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_listeners() {
        assert!(!Shutdown::new().trigger());
    }
}
