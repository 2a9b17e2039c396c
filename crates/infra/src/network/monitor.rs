use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::ConnectivityObserver;

/// Connectivity state driven by the host
///
/// Platforms that already receive reachability callbacks from the OS feed
/// them in through [`NetworkMonitor::set_connected`]. Clones share the same
/// channel.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl NetworkMonitor {
    pub fn new(connected: bool) -> Self {
        let (tx, _rx) = watch::channel(connected);
        Self { tx: Arc::new(tx) }
    }

    /// Publish the current reachability. Only changes wake subscribers.
    pub fn set_connected(&self, connected: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == connected {
                return false;
            }
            *current = connected;
            true
        });
        if changed {
            info!(connected, "Network connectivity changed");
        }
    }

    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityObserver for NetworkMonitor {
    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
