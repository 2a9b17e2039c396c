//! Authenticated API client
//!
//! [`ApiClient`] wraps an [`HttpTransport`] and adds three behaviours on top
//! of a plain send:
//!
//! - the stored access token is attached as a bearer token
//! - a 401 triggers at most one refresh at a time; requests that hit 401
//!   while a refresh is in flight wait for its outcome and replay themselves
//! - non-GET requests issued while offline wait in a FIFO queue and are
//!   replayed, in order, once connectivity returns
//!
//! All mutable state lives in one [`ClientState`] behind a `parking_lot`
//! mutex. The lock is never held across an `.await`; the refresh
//! check-then-set happens in a single critical section.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

use farmlink_common::{CredentialStore, KeychainProvider, TokenStore};
use farmlink_domain::{ApiConfig, Config};
use parking_lot::Mutex;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use super::refresh::{HttpRefreshEndpoint, RefreshEndpoint};
use crate::http::{HttpClient, HttpTransport, RequestConfig, TransportError, TransportResponse};
use crate::network::{ConnectivityObserver, ProbeMonitor};

/// Successful response returned by [`ApiClient::request`]
pub type ApiResponse = TransportResponse;

type RefreshOutcome = Result<String, ApiError>;
type Completion = oneshot::Sender<Result<ApiResponse, ApiError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshState {
    Idle,
    Refreshing,
}

/// What to do with a request given the current connectivity
enum Dispatch {
    Send(RequestConfig),
    Deferred(oneshot::Receiver<Result<ApiResponse, ApiError>>),
    /// Offline after shutdown; nothing would ever drain it
    Rejected,
}

/// A request parked until connectivity returns
struct PendingRequest {
    config: RequestConfig,
    completion: Completion,
}

struct ClientState {
    refresh: RefreshState,
    refresh_waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    offline_queue: VecDeque<PendingRequest>,
    is_online: bool,
    draining: bool,
    shut_down: bool,
}

impl ClientState {
    fn new(is_online: bool) -> Self {
        Self {
            refresh: RefreshState::Idle,
            refresh_waiters: Vec::new(),
            offline_queue: VecDeque::new(),
            is_online,
            draining: false,
            shut_down: false,
        }
    }
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialStore,
    refresher: Arc<dyn RefreshEndpoint>,
    default_timeout: Duration,
    upload_timeout: Duration,
    platform: String,
    state: Mutex<ClientState>,
    connectivity: Option<watch::Receiver<bool>>,
    _observer: Option<Arc<dyn ConnectivityObserver>>,
    cancellation_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

/// Cheap-to-clone handle to one authenticated client
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Production client: reqwest transport, platform keychain, and a health
    /// probe when `network.probe_enabled` is set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Setup` if the config is invalid, the HTTP client
    /// cannot be built or no Tokio runtime is available for the background
    /// tasks
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        validate(&config)?;
        let http = HttpClient::from_config(&config.api)?;

        let mut builder = Self::builder().transport(Arc::new(http.clone()));
        if config.network.probe_enabled {
            ensure_runtime()?;
            let probe = ProbeMonitor::spawn(http, config.network.probe_interval(), true);
            builder = builder.connectivity(Arc::new(probe));
        }

        builder.config(config).build()
    }

    /// Send a request with token attachment, 401 recovery and offline queueing
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]. A 401 on a request that was
    /// already replayed after a refresh is returned as is; a failed refresh
    /// returns the original 401.
    #[instrument(skip(self, config), fields(method = %config.method, url = %config.url))]
    pub async fn request(&self, mut config: RequestConfig) -> Result<ApiResponse, ApiError> {
        self.inner.attach_token(&mut config).await;
        if config.timeout.is_none() {
            config.timeout = Some(self.inner.default_timeout);
        }

        let config = match self.inner.defer_if_offline(config) {
            Dispatch::Send(config) => config,
            Dispatch::Deferred(deferred) => {
                return deferred.await.unwrap_or(Err(ApiError::Cancelled));
            }
            Dispatch::Rejected => return Err(ApiError::Cancelled),
        };

        match self.inner.transport.send(&config).await {
            Ok(response) => Ok(response),
            Err(TransportError::Status(response)) if response.status == 401 && !config.retried => {
                self.inner.recover_unauthorized(config, response).await
            }
            Err(err) => Err(ApiError::from(err)),
        }
    }

    /// [`request`](Self::request), then deserialize the body.
    ///
    /// # Errors
    ///
    /// Any `request` error, or `ApiError::Decode` if the body does not match `R`
    pub async fn request_json<R: DeserializeOwned>(&self, config: RequestConfig) -> Result<R, ApiError> {
        let response = self.request(config).await?;
        response.json().map_err(|err| ApiError::decode(&err))
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Stores the new access token (and the rotated refresh token, if any).
    /// Returns `None` on any failure. This does not coordinate with
    /// concurrent 401 handling; `request` does that.
    pub async fn refresh_access_token(&self) -> Option<String> {
        self.inner.refresh_access_token().await
    }

    /// Replay queued offline requests in FIFO order.
    ///
    /// Runs automatically when the connectivity listener sees the network
    /// come back. Stops early if connectivity drops again.
    pub async fn process_offline_queue(&self) {
        self.inner.process_offline_queue().await;
    }

    // Credential passthroughs

    pub async fn get_token(&self) -> Option<String> {
        self.inner.credentials.access_token().await
    }

    pub async fn set_token(&self, token: &str) {
        self.inner.credentials.set_access_token(token).await;
    }

    pub async fn set_refresh_token(&self, token: &str) {
        self.inner.credentials.set_refresh_token(token).await;
    }

    pub async fn clear_tokens(&self) {
        self.inner.credentials.clear().await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.credentials.is_authenticated().await
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    // Diagnostics

    pub fn offline_queue_len(&self) -> usize {
        self.inner.state.lock().offline_queue.len()
    }

    pub fn is_online(&self) -> bool {
        self.inner.state.lock().is_online
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.state.lock().refresh == RefreshState::Refreshing
    }

    pub(crate) fn upload_timeout(&self) -> Duration {
        self.inner.upload_timeout
    }

    pub(crate) fn platform(&self) -> &str {
        &self.inner.platform
    }

    /// Stop the connectivity listener and fail any still-queued requests
    /// with `ApiError::Cancelled`.
    ///
    /// Nothing drains the queue afterwards, so later requests that would be
    /// queued fail with `ApiError::Cancelled` straight away.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.inner.cancellation_token.cancel();

        let handle = self.inner.listener.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(Duration::from_secs(5), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Connectivity listener panicked: {}", e),
                Err(_) => warn!("Connectivity listener did not complete within timeout"),
            }
        }

        let abandoned: Vec<PendingRequest> = {
            let mut state = self.inner.state.lock();
            state.shut_down = true;
            state.offline_queue.drain(..).collect()
        };
        let count = abandoned.len();
        for pending in abandoned {
            // The caller may already be gone.
            let _ = pending.completion.send(Err(ApiError::Cancelled));
        }

        info!(cancelled = count, "API client shut down");
    }
}

impl Inner {
    async fn attach_token(&self, config: &mut RequestConfig) {
        if let Some(token) = self.credentials.access_token().await {
            if let Err(e) = config.set_bearer(&token) {
                warn!(error = %e, "Stored access token is not a valid header value; sending without it");
            }
        }
    }

    /// Hand the config back if it may be sent now, otherwise park it.
    fn defer_if_offline(&self, config: RequestConfig) -> Dispatch {
        let mut state = self.state.lock();
        if state.is_online || config.method == Method::GET {
            return Dispatch::Send(config);
        }
        if state.shut_down {
            warn!("Offline after shutdown; request not queued");
            return Dispatch::Rejected;
        }

        let (completion, receiver) = oneshot::channel();
        state.offline_queue.push_back(PendingRequest { config, completion });
        info!(queued = state.offline_queue.len(), "Offline; request queued until connectivity returns");
        Dispatch::Deferred(receiver)
    }

    async fn recover_unauthorized(
        &self,
        mut config: RequestConfig,
        unauthorized: TransportResponse,
    ) -> Result<ApiResponse, ApiError> {
        let waiter = {
            let mut state = self.state.lock();
            match state.refresh {
                RefreshState::Refreshing => {
                    let (tx, rx) = oneshot::channel();
                    state.refresh_waiters.push(tx);
                    Some(rx)
                }
                RefreshState::Idle => {
                    state.refresh = RefreshState::Refreshing;
                    None
                }
            }
        };
        config.retried = true;

        if let Some(outcome) = waiter {
            debug!("Refresh already in flight; waiting for its outcome");
            let token = outcome.await.unwrap_or(Err(ApiError::Cancelled))?;
            return self.replay(config, &token).await;
        }

        let guard = RefreshGuard { state: &self.state, settled: false };
        let failure = ApiError::from_response(&unauthorized);

        if let Some(token) = self.refresh_access_token().await {
            guard.settle(Ok(token.clone()));
            self.replay(config, &token).await
        } else {
            self.credentials.clear().await;
            guard.settle(Err(failure.clone()));
            Err(failure)
        }
    }

    async fn replay(&self, mut config: RequestConfig, token: &str) -> Result<ApiResponse, ApiError> {
        if let Err(e) = config.set_bearer(token) {
            warn!(error = %e, "Refreshed access token is not a valid header value");
        }
        self.transport.send(&config).await.map_err(ApiError::from)
    }

    #[instrument(skip(self))]
    async fn refresh_access_token(&self) -> Option<String> {
        let Some(refresh_token) = self.credentials.refresh_token().await else {
            warn!("No refresh token available");
            return None;
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(tokens) => {
                self.credentials.set_access_token(&tokens.access_token).await;
                if let Some(rotated) = tokens.refresh_token.as_deref() {
                    self.credentials.set_refresh_token(rotated).await;
                }
                info!(rotated = tokens.refresh_token.is_some(), "Access token refreshed");
                Some(tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                None
            }
        }
    }

    fn link_up(&self) -> bool {
        self.connectivity.as_ref().map_or(true, |rx| *rx.borrow())
    }

    async fn on_connectivity(&self, online: bool) {
        let (was_online, queued) = {
            let mut state = self.state.lock();
            let was_online = state.is_online;
            state.is_online = online;
            (was_online, state.offline_queue.len())
        };

        if !online {
            if was_online {
                info!(queued, "Connectivity lost");
            }
            return;
        }

        if !was_online {
            info!(queued, "Connectivity restored");
        }
        self.process_offline_queue().await;
    }

    #[instrument(skip(self))]
    async fn process_offline_queue(&self) {
        {
            let mut state = self.state.lock();
            if state.draining || state.offline_queue.is_empty() {
                return;
            }
            state.draining = true;
        }
        let _guard = DrainGuard { state: &self.state };

        let mut replayed = 0usize;
        let mut skipped = 0usize;
        loop {
            let link_up = self.link_up();
            let next = {
                let mut state = self.state.lock();
                if state.is_online && link_up {
                    state.offline_queue.pop_front()
                } else {
                    None
                }
            };
            let Some(pending) = next else { break };

            if pending.completion.is_closed() {
                skipped += 1;
                continue;
            }

            let result = self.transport.send(&pending.config).await.map_err(ApiError::from);
            if pending.completion.send(result).is_err() {
                debug!("Caller dropped before its queued request settled");
            }
            replayed += 1;
        }

        let remaining = self.state.lock().offline_queue.len();
        info!(replayed, skipped, remaining, "Offline queue processed");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            debug!("ApiClient dropped while listening; cancelling");
            self.cancellation_token.cancel();
        }
    }
}

/// Returns the refresh state to `Idle` and settles every waiter exactly once,
/// including when the leading request is cancelled mid-refresh.
struct RefreshGuard<'a> {
    state: &'a Mutex<ClientState>,
    settled: bool,
}

impl RefreshGuard<'_> {
    fn settle(mut self, outcome: RefreshOutcome) {
        self.finish(&outcome);
        self.settled = true;
    }

    fn finish(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.refresh = RefreshState::Idle;
            std::mem::take(&mut state.refresh_waiters)
        };
        debug!(waiters = waiters.len(), success = outcome.is_ok(), "Refresh settled");
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.finish(&Err(ApiError::Cancelled));
        }
    }
}

struct DrainGuard<'a> {
    state: &'a Mutex<ClientState>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().draining = false;
    }
}

fn ensure_runtime() -> Result<(), ApiError> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|_| ApiError::setup("ApiClient background tasks require a Tokio runtime"))
}

fn spawn_listener(inner: &Arc<Inner>, mut rx: watch::Receiver<bool>) -> JoinHandle<()> {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    let cancel = inner.cancellation_token.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Connectivity listener cancelled");
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        debug!("Connectivity observer closed");
                        break;
                    }
                    let online = *rx.borrow_and_update();
                    let Some(inner) = weak.upgrade() else { break };
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = inner.on_connectivity(online) => {}
                    }
                }
            }
        }
    })
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<Config>,
    transport: Option<Arc<dyn HttpTransport>>,
    token_store: Option<Arc<dyn TokenStore>>,
    refresher: Option<Arc<dyn RefreshEndpoint>>,
    connectivity: Option<Arc<dyn ConnectivityObserver>>,
}

impl ApiClientBuilder {
    /// Set the client configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Transport for every request; defaults to an [`HttpClient`] built from
    /// the configuration
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Token storage; defaults to the platform keychain
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Refresh endpoint; defaults to `POST {refresh_path}` on the transport
    pub fn refresh_endpoint(mut self, refresher: Arc<dyn RefreshEndpoint>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Connectivity source. Without one the client is always online.
    pub fn connectivity(mut self, observer: Arc<dyn ConnectivityObserver>) -> Self {
        self.connectivity = Some(observer);
        self
    }

    /// Build the client and, if a connectivity observer is set, spawn its
    /// listener.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Setup` if the config is invalid, the default
    /// transport cannot be built or an observer is set outside a Tokio
    /// runtime
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        validate(&config)?;
        let ApiConfig { refresh_path, platform, .. } = &config.api;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::from_config(&config.api)?),
        };
        let token_store = self.token_store.unwrap_or_else(|| {
            Arc::new(KeychainProvider::new(config.storage.keychain_service.clone()))
        });
        let refresher = self.refresher.unwrap_or_else(|| {
            Arc::new(HttpRefreshEndpoint::with_path(Arc::clone(&transport), refresh_path.clone()))
        });

        let receiver = match &self.connectivity {
            Some(observer) => {
                ensure_runtime()?;
                Some(observer.subscribe())
            }
            None => None,
        };
        let is_online = receiver.as_ref().map_or(true, |rx| *rx.borrow());

        let inner = Arc::new(Inner {
            transport,
            credentials: CredentialStore::new(token_store),
            refresher,
            default_timeout: config.api.timeout(),
            upload_timeout: config.api.upload_timeout(),
            platform: platform.clone(),
            state: Mutex::new(ClientState::new(is_online)),
            connectivity: receiver.clone(),
            _observer: self.connectivity,
            cancellation_token: CancellationToken::new(),
            listener: Mutex::new(None),
        });

        if let Some(rx) = receiver {
            let handle = spawn_listener(&inner, rx);
            *inner.listener.lock() = Some(handle);
        }

        info!(base_url = %config.api.base_url, is_online, "API client ready");

        Ok(ApiClient { inner })
    }
}

fn validate(config: &Config) -> Result<(), ApiError> {
    config.validate().map_err(|e| ApiError::setup(e.to_string()))
}
