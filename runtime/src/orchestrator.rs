//! Async orchestration of a single request.
//!
//! [`AsyncRequest`] takes a deferred operation and drives the lifecycle
//! through `Pending` and then `Resolved` or `Rejected`. Every result goes
//! through a [`GuardedDispatcher`], so nothing lands after the owning view is
//! torn down, and every cycle carries a [`Generation`], so a result from a
//! superseded cycle never overwrites a newer one.
//!
//! # Example
//!
//! ```ignore
//! let liveness = Liveness::mounted();
//! let request = AsyncRequest::<UserProfile, FetchError>::new(true, liveness.probe());
//!
//! let mut handle = request.run(fetcher.fetch(&subject)).await;
//! assert!(request.snapshot().await.is_pending());
//!
//! handle.wait().await;
//! ```

use crate::dispatch::{Dispatched, GuardedDispatcher};
use crate::liveness::LivenessProbe;
use crate::metrics::RequestMetrics;
use crate::{EffectHandle, Store, StoreConfig, StoreError};
use request_lifecycle_core::effect::Effect;
use request_lifecycle_core::request::{RequestAction, RequestState, RequestStatus};
use request_lifecycle_core::subject::Generation;
use request_lifecycle_core::tracked::{TrackedAction, TrackedReducer, TrackedState};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

/// Store type driven by [`AsyncRequest`]
pub type RequestStore<T, E> =
    Store<TrackedState<T, E>, TrackedAction<T, E>, (), TrackedReducer<T, E>>;

/// Orchestrates one logical request at a time.
pub struct AsyncRequest<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    dispatcher:
        GuardedDispatcher<TrackedState<T, E>, TrackedAction<T, E>, (), TrackedReducer<T, E>>,
    current: Arc<AtomicU64>,
    stale: Arc<AtomicU64>,
}

impl<T, E> AsyncRequest<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create the request for a freshly mounted view.
    ///
    /// Starts `Pending` when a subject was supplied at mount, else `Idle`.
    #[must_use]
    pub fn new(has_subject: bool, probe: LivenessProbe) -> Self {
        Self::with_config(has_subject, probe, StoreConfig::default())
    }

    /// Like [`new`](Self::new), with custom store configuration
    #[must_use]
    pub fn with_config(has_subject: bool, probe: LivenessProbe, config: StoreConfig) -> Self {
        Self::with_initial_state_and_config(RequestState::initial(has_subject), probe, config)
    }

    /// Create the request starting from a caller-supplied state.
    ///
    /// A view that already holds data can mount `Resolved` with it. The
    /// state belongs to the initial generation, so the first `run` or setter
    /// supersedes it.
    #[must_use]
    pub fn with_initial_state(initial: RequestState<T, E>, probe: LivenessProbe) -> Self {
        Self::with_initial_state_and_config(initial, probe, StoreConfig::default())
    }

    /// Like [`with_initial_state`](Self::with_initial_state), with custom
    /// store configuration
    #[must_use]
    pub fn with_initial_state_and_config(
        initial: RequestState<T, E>,
        probe: LivenessProbe,
        config: StoreConfig,
    ) -> Self {
        let store = Store::with_config(TrackedState::new(initial), TrackedReducer::new(), (), config);

        Self {
            dispatcher: GuardedDispatcher::wrap(store, probe),
            current: Arc::new(AtomicU64::new(Generation::INITIAL.value())),
            stale: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_generation(&self) -> Generation {
        Generation::new(self.current.fetch_add(1, Ordering::SeqCst)).next()
    }

    /// Start a new cycle for `operation`.
    ///
    /// The state is `Pending` when this returns. The operation runs in the
    /// background; its result is applied only if the view is still mounted
    /// and no later cycle has started. The returned handle completes once
    /// that result has been applied or dropped.
    #[tracing::instrument(skip_all, name = "request_run", fields(generation))]
    pub async fn run<F>(&self, operation: F) -> EffectHandle
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let generation = self.next_generation();
        tracing::Span::current().record("generation", generation.value());

        if self
            .dispatcher
            .dispatch(TrackedAction::Begin { generation })
            .await
            .is_suppressed()
        {
            return EffectHandle::completed();
        }
        RequestMetrics::record_started();
        tracing::debug!("Request pending");

        let current = Arc::clone(&self.current);
        let stale = Arc::clone(&self.stale);

        self.dispatcher.spawn(Effect::future(async move {
            let outcome = operation.await;
            RequestMetrics::record_settled(outcome.is_ok());

            let latest = current.load(Ordering::SeqCst);
            if generation.value() != latest {
                tracing::debug!(
                    generation = %generation,
                    latest = latest,
                    "Discarding stale result"
                );
                RequestMetrics::record_stale_discarded();
                stale.fetch_add(1, Ordering::Relaxed);
                return None;
            }

            Some(TrackedAction::Settle {
                generation,
                outcome,
            })
        }))
    }

    /// Set `Resolved { data }` directly, superseding any cycle in flight
    pub async fn set_data(&self, data: T) -> Dispatched {
        self.assign(RequestAction::Resolved { data }).await
    }

    /// Set `Rejected { error }` directly, superseding any cycle in flight
    pub async fn set_error(&self, error: E) -> Dispatched {
        self.assign(RequestAction::Rejected { error }).await
    }

    async fn assign(&self, action: RequestAction<T, E>) -> Dispatched {
        let generation = self.next_generation();
        tracing::debug!(generation = %generation, status = %action.target_status(), "Assigning state");
        self.dispatcher
            .dispatch(TrackedAction::Assign { generation, action })
            .await
    }

    /// Return to `Idle`, invalidating any cycle in flight
    pub async fn reset(&self) -> Dispatched {
        let generation = self.next_generation();
        tracing::debug!(generation = %generation, "Resetting to idle");
        self.dispatcher
            .dispatch(TrackedAction::Reset { generation })
            .await
    }

    /// A copy of the current request state
    pub async fn snapshot(&self) -> RequestState<T, E> {
        self.store().state(|s| s.request().clone()).await
    }

    /// Current status
    pub async fn status(&self) -> RequestStatus {
        self.store().state(TrackedState::status).await
    }

    /// Generation the current state belongs to
    pub async fn generation(&self) -> Generation {
        self.store().state(TrackedState::generation).await
    }

    /// Results dropped because a later cycle had started
    pub async fn discarded(&self) -> u64 {
        let in_reducer = self.store().state(TrackedState::discarded).await;
        in_reducer + self.stale.load(Ordering::Relaxed)
    }

    /// Actions fed back by continuations and applied to state
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackedAction<T, E>> {
        self.store().subscribe_actions()
    }

    /// Whether results are still applied
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.dispatcher.is_live()
    }

    /// Stop accepting updates; running operations are left to finish
    pub fn close(&self) {
        self.store().close();
    }

    /// Close and wait for running operations to finish
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if operations are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store().shutdown(timeout).await
    }

    /// [`shutdown`](Self::shutdown) with the timeout from [`StoreConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if operations are still running
    /// after the configured timeout.
    pub async fn shutdown_default(&self) -> Result<(), StoreError> {
        self.store().shutdown_default().await
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &RequestStore<T, E> {
        self.dispatcher.store()
    }
}

impl<T, E> Clone for AsyncRequest<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            current: Arc::clone(&self.current),
            stale: Arc::clone(&self.stale),
        }
    }
}
