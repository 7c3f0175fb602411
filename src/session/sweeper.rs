//! Background expiry of idle sessions.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::observability::metrics;
use crate::session::store::SessionStore;

/// Periodically purge sessions idle for at least `max_idle`.
///
/// The task exits when `shutdown` fires or its sender is dropped.
pub fn spawn_sweeper(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    max_idle: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = store.purge_idle(max_idle);
                    if purged > 0 {
                        tracing::debug!(purged, "Expired idle sessions");
                    }
                    metrics::record_active_sessions(store.len());
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Session sweeper stopping");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemorySessionStore, SessionId};

    #[tokio::test]
    async fn test_sweeper_purges_and_stops() {
        let store = Arc::new(MemorySessionStore::new());
        store.modify(&SessionId::generate(), &mut |_| {});

        let (tx, rx) = broadcast::channel(1);
        let handle = spawn_sweeper(
            store.clone(),
            Duration::from_millis(10),
            Duration::ZERO,
            rx,
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}
