//! Resource Store
//!
//! A fetch + state controller bound to one collection resource. The store
//! exposes `{status, data, error}` through a `watch` channel and applies only
//! the response of the most recently issued request:
//!
//! - every `fetch` takes the next sequence number and cancels the request it
//!   supersedes
//! - a response is applied only if its sequence number is still the latest
//!   issued one, so a slow older response can never overwrite a newer one
//! - `close()` (or dropping the store) cancels whatever is in flight

mod fetchers;

pub use fetchers::*;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientResult};

// ============================================================================
// Resource
// ============================================================================

/// Lifecycle of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable state of one resource.
///
/// Constructors uphold the invariants: `data` is only non-empty on
/// `Success`, `error` is only set on `Error`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    status: ResourceStatus,
    data: Vec<T>,
    error: Option<String>,
}

impl<T> Resource<T> {
    pub fn idle() -> Self {
        Self {
            status: ResourceStatus::Idle,
            data: Vec::new(),
            error: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: ResourceStatus::Loading,
            data: Vec::new(),
            error: None,
        }
    }

    pub fn success(data: Vec<T>) -> Self {
        Self {
            status: ResourceStatus::Success,
            data,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ResourceStatus::Error,
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    /// Items in server order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == ResourceStatus::Loading
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::idle()
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Loads one collection resource from the backend
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Query: Clone + Default + fmt::Debug + Send + Sync + 'static;

    /// Message used when a failure carries no backend message
    const FALLBACK_MESSAGE: &'static str;

    async fn load(&self, query: &Self::Query) -> ClientResult<Vec<Self::Item>>;
}

// ============================================================================
// ResourceStore
// ============================================================================

/// Bookkeeping for the request currently considered authoritative
struct InFlight<Q> {
    token: Option<CancellationToken>,
    last_query: Option<Q>,
}

/// Fetch/state controller for one resource kind and query
pub struct ResourceStore<F: Fetcher> {
    fetcher: F,
    state: watch::Sender<Resource<F::Item>>,
    /// Highest sequence number handed out, only written under `in_flight`
    issued: AtomicU64,
    in_flight: Mutex<InFlight<F::Query>>,
    lifetime: CancellationToken,
}

impl<F: Fetcher> ResourceStore<F> {
    pub fn new(fetcher: F) -> Self {
        let (state, _) = watch::channel(Resource::idle());
        Self {
            fetcher,
            state,
            issued: AtomicU64::new(0),
            in_flight: Mutex::new(InFlight {
                token: None,
                last_query: None,
            }),
            lifetime: CancellationToken::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Current state
    pub fn snapshot(&self) -> Resource<F::Item> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<Resource<F::Item>> {
        self.state.subscribe()
    }

    /// Token cancelled when the store is closed or dropped
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Query of the most recent fetch, if any
    pub fn last_query(&self) -> Option<F::Query> {
        self.lock_in_flight().last_query.clone()
    }

    /// Issue one fetch and return the visible state once it settles.
    ///
    /// A superseded fetch waits for the newer one to settle (or for the store
    /// to close) and returns that state, so the result is never `Loading`.
    /// Dropping the returned future mid-flight resets the store to `Idle`
    /// unless a newer fetch has taken over.
    pub async fn fetch(&self, query: F::Query) -> Resource<F::Item> {
        if self.is_closed() {
            tracing::debug!(?query, "fetch on closed store ignored");
            return self.snapshot();
        }

        let (seq, token) = self.begin(query.clone());
        let pending = PendingFetch {
            store: self,
            seq,
            settled: false,
        };
        self.state.send_if_modified(|state| {
            if !self.is_latest(seq) {
                return false;
            }
            *state = Resource::loading();
            true
        });
        tracing::debug!(seq, ?query, "fetch issued");

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = self.fetcher.load(&query) => result,
        };

        match outcome {
            Err(ClientError::Cancelled) => self.abandon(seq),
            result => self.apply(seq, result),
        }
        pending.settle();

        if self.is_latest(seq) || self.is_closed() {
            return self.snapshot();
        }
        self.wait_settled().await
    }

    /// Re-issue the last query (or the default one)
    pub async fn refresh(&self) -> Resource<F::Item> {
        let query = self.last_query().unwrap_or_default();
        self.fetch(query).await
    }

    /// Cancel in-flight work and return to `Idle`; later fetches are ignored
    pub fn close(&self) {
        self.lifetime.cancel();
        self.state.send_replace(Resource::idle());
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, InFlight<F::Query>> {
        // Poisoning only means another fetch panicked mid-update; the
        // bookkeeping is still consistent.
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take a sequence number and supersede the previous request
    fn begin(&self, query: F::Query) -> (u64, CancellationToken) {
        let mut in_flight = self.lock_in_flight();
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = self.lifetime.child_token();
        if let Some(previous) = in_flight.token.replace(token.clone()) {
            previous.cancel();
        }
        in_flight.last_query = Some(query);
        (seq, token)
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    /// Release the request slot of `seq`; an unsettled latest request leaves
    /// the store `Idle` instead of `Loading`
    fn finish(&self, seq: u64, settled: bool) {
        let mut in_flight = self.lock_in_flight();
        if !self.is_latest(seq) {
            return;
        }
        in_flight.token = None;
        if settled {
            return;
        }
        tracing::debug!(seq, "fetch dropped before settling");
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = Resource::idle();
            true
        });
    }

    /// Wait until the state leaves `Loading` or the store closes
    async fn wait_settled(&self) -> Resource<F::Item> {
        let mut state = self.subscribe();
        loop {
            if !state.borrow_and_update().is_loading() {
                break;
            }
            tokio::select! {
                _ = self.lifetime.cancelled() => break,
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        self.snapshot()
    }

    fn apply(&self, seq: u64, result: ClientResult<Vec<F::Item>>) {
        let applied = self.state.send_if_modified(|state| {
            if !self.is_latest(seq) {
                return false;
            }
            *state = match result {
                Ok(items) => Resource::success(items),
                Err(e) => {
                    tracing::warn!(seq, error = %e, "fetch failed");
                    Resource::failure(e.user_message(F::FALLBACK_MESSAGE))
                }
            };
            true
        });
        if !applied {
            tracing::debug!(seq, "discarding stale response");
        }
    }

    fn abandon(&self, seq: u64) {
        if !self.is_closed() {
            tracing::debug!(seq, error = %ClientError::Cancelled, "fetch superseded");
            return;
        }
        tracing::debug!(seq, error = %ClientError::Cancelled, "fetch cancelled, store closed");
        self.state.send_if_modified(|state| {
            if !self.is_latest(seq) || !state.is_loading() {
                return false;
            }
            *state = Resource::idle();
            true
        });
    }
}

/// Request slot held by one `fetch` call until it settles or is dropped
struct PendingFetch<'a, F: Fetcher> {
    store: &'a ResourceStore<F>,
    seq: u64,
    settled: bool,
}

impl<F: Fetcher> PendingFetch<'_, F> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl<F: Fetcher> Drop for PendingFetch<'_, F> {
    fn drop(&mut self) {
        self.store.finish(self.seq, self.settled);
    }
}

impl<F: Fetcher> Drop for ResourceStore<F> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
