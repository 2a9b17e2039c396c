//! Health-probe connectivity monitor
//!
//! Polls `GET {base}/health` on a fixed interval and publishes
//! online/offline transitions. A probe that gets any HTTP answer (even a
//! non-2xx one) means the network is up; only a missing response counts as
//! offline.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::ConnectivityObserver;
use crate::http::HttpClient;

/// Background connectivity monitor backed by the API health endpoint
pub struct ProbeMonitor {
    tx: Arc<watch::Sender<bool>>,
    cancellation_token: CancellationToken,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ProbeMonitor {
    /// Spawn the probe loop. The first probe runs immediately.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(client))]
    pub fn spawn(client: HttpClient, interval: Duration, initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        let tx = Arc::new(tx);
        let cancellation_token = CancellationToken::new();

        let handle = tokio::spawn(Self::probe_loop(
            client,
            interval,
            Arc::clone(&tx),
            cancellation_token.clone(),
        ));

        info!(interval_secs = interval.as_secs(), "Connectivity probe started");

        Self { tx, cancellation_token, task_handle: Mutex::new(Some(handle)) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.lock().is_some()
    }

    /// Stop probing and wait for the loop to exit.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        self.cancellation_token.cancel();

        let handle = self.task_handle.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(Duration::from_secs(5), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Probe task panicked: {}", e),
                Err(_) => warn!("Probe task did not complete within timeout"),
            }
        }

        info!("Connectivity probe stopped");
    }

    async fn probe_loop(
        client: HttpClient,
        interval: Duration,
        tx: Arc<watch::Sender<bool>>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Probe loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let online = client.health_check().await.is_ok();
                    let changed = tx.send_if_modified(|current| {
                        if *current == online {
                            return false;
                        }
                        *current = online;
                        true
                    });
                    if changed {
                        info!(online, "Connectivity changed");
                    }
                }
            }
        }
    }
}

impl ConnectivityObserver for ProbeMonitor {
    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            debug!("ProbeMonitor dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
