//! Guarded dispatch.
//!
//! A [`GuardedDispatcher`] wraps a [`Store`] together with a
//! [`LivenessProbe`]. While the owning view is mounted every dispatch is
//! forwarded to the store. Once the view is torn down every dispatch is a
//! silent no-op, including actions fed back by effects spawned through the
//! dispatcher before teardown.
//!
//! # Example
//!
//! ```ignore
//! let liveness = Liveness::mounted();
//! let dispatcher = GuardedDispatcher::wrap(store, liveness.probe());
//!
//! assert!(dispatcher.dispatch(Action::Ping).await.is_applied());
//!
//! liveness.teardown();
//! assert!(dispatcher.dispatch(Action::Ping).await.is_suppressed());
//! ```

use crate::liveness::LivenessProbe;
use crate::{EffectHandle, Feedback, Store, StoreError};
use request_lifecycle_core::effect::Effect;
use request_lifecycle_core::reducer::Reducer;

/// Outcome of [`GuardedDispatcher::dispatch`]
#[derive(Debug)]
#[must_use]
pub enum Dispatched {
    /// The action reached the reducer; the handle tracks its effects
    Applied(EffectHandle),
    /// The view was gone (or the store closed); nothing changed
    Suppressed,
}

impl Dispatched {
    /// Whether the action reached the reducer
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Whether the action was dropped
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }

    /// The effect handle, or an already completed one if suppressed
    #[must_use]
    pub fn into_handle(self) -> EffectHandle {
        match self {
            Self::Applied(handle) => handle,
            Self::Suppressed => EffectHandle::completed(),
        }
    }
}

/// Store update gated on a view's liveness.
pub struct GuardedDispatcher<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    store: Store<S, A, E, R>,
    probe: LivenessProbe,
}

impl<S, A, E, R> GuardedDispatcher<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Gate `store` on `probe`
    #[must_use]
    pub const fn wrap(store: Store<S, A, E, R>, probe: LivenessProbe) -> Self {
        Self { store, probe }
    }

    /// Forward `action` to the store if the view is still mounted.
    ///
    /// Never fails: a torn-down view or a closed store yields
    /// [`Dispatched::Suppressed`].
    pub async fn dispatch(&self, action: A) -> Dispatched {
        match self.store.send_gated(action, &self.probe).await {
            Ok(Some(handle)) => Dispatched::Applied(handle),
            Ok(None) => Dispatched::Suppressed,
            Err(StoreError::ShutdownInProgress) => {
                tracing::trace!("Dropping action: store closed");
                Dispatched::Suppressed
            },
            Err(error) => {
                tracing::debug!(error = %error, "Dropping action");
                Dispatched::Suppressed
            },
        }
    }

    /// Run `effect` in the background, feeding its action back through the gate.
    ///
    /// Nothing is spawned if the view is already gone.
    pub fn spawn(&self, effect: Effect<A>) -> EffectHandle {
        if !self.probe.is_alive() {
            metrics::counter!("dispatch.suppressed").increment(1);
            return EffectHandle::completed();
        }
        self.store.execute(effect, Feedback::Gated(self.probe.clone()))
    }

    /// Whether dispatches currently reach the store
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.probe.is_alive()
    }

    /// The wrapped store
    #[must_use]
    pub const fn store(&self) -> &Store<S, A, E, R> {
        &self.store
    }
}

impl<S, A, E, R> Clone for GuardedDispatcher<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            probe: self.probe.clone(),
        }
    }
}
