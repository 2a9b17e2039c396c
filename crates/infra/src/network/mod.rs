//! Connectivity observation
//!
//! The API client only needs to know "online or not" and to be told when
//! that changes. Observers expose a `watch` channel: the current value is
//! always readable and every transition wakes subscribers. Unsubscribing is
//! dropping the receiver.

mod monitor;
mod probe;

pub use monitor::NetworkMonitor;
pub use probe::ProbeMonitor;
use tokio::sync::watch;

/// Source of connectivity transitions
pub trait ConnectivityObserver: Send + Sync {
    /// Receiver whose value is `true` while the network is reachable.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
