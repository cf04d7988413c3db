//! Staleness-aware wrapper around the lifecycle reducer.
//!
//! Two requests for different subjects may overlap, and nothing guarantees
//! which settles first. [`TrackedReducer`] stamps every restart with a
//! [`Generation`] and applies a settled result only when it carries the
//! current generation. Anything older is counted and dropped.

use crate::effect::Effect;
use crate::reducer::Reducer;
use crate::request::{RequestAction, RequestReducer, RequestState, RequestStatus};
use crate::subject::Generation;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// A [`RequestState`] together with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedState<T, E> {
    request: RequestState<T, E>,
    generation: Generation,
    discarded: u64,
}

impl<T, E> TrackedState<T, E> {
    /// Wrap a request state at [`Generation::INITIAL`]
    #[must_use]
    pub const fn new(request: RequestState<T, E>) -> Self {
        Self {
            request,
            generation: Generation::INITIAL,
            discarded: 0,
        }
    }

    /// State at mount, see [`RequestState::initial`]
    #[must_use]
    pub const fn mounted(has_subject: bool) -> Self {
        Self::new(RequestState::initial(has_subject))
    }

    /// The current request state
    #[must_use]
    pub const fn request(&self) -> &RequestState<T, E> {
        &self.request
    }

    /// Shortcut for `self.request().status()`
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.request.status()
    }

    /// Generation of the cycle the state reflects
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of stale results dropped so far
    #[must_use]
    pub const fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Consume the wrapper, returning the request state
    #[must_use]
    pub fn into_request(self) -> RequestState<T, E> {
        self.request
    }
}

impl<T, E> Default for TrackedState<T, E> {
    fn default() -> Self {
        Self::new(RequestState::Idle)
    }
}

/// Actions accepted by [`TrackedReducer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrackedAction<T, E> {
    /// A new request cycle starts; the state becomes `Pending`
    Begin {
        /// Ticket of the new cycle
        generation: Generation,
    },
    /// The subject was cleared; the state becomes `Idle`
    Reset {
        /// Ticket of the new cycle
        generation: Generation,
    },
    /// Set the state directly, bypassing a deferred operation
    Assign {
        /// Ticket of the new cycle
        generation: Generation,
        /// The transition to apply
        action: RequestAction<T, E>,
    },
    /// A deferred operation settled
    Settle {
        /// Ticket of the cycle that started the operation
        generation: Generation,
        /// What the operation produced
        outcome: Result<T, E>,
    },
}

impl<T, E> TrackedAction<T, E> {
    /// The generation this action is stamped with
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::Begin { generation }
            | Self::Reset { generation }
            | Self::Assign { generation, .. }
            | Self::Settle { generation, .. } => *generation,
        }
    }

    /// Whether this action carries the result of a deferred operation
    #[must_use]
    pub const fn is_settle(&self) -> bool {
        matches!(self, Self::Settle { .. })
    }
}

/// Lifecycle reducer with generation checks.
///
/// - `Begin`, `Reset` and `Assign` older than the current generation were
///   overtaken by a later restart and are ignored.
/// - `Settle` applies only when its generation is the current one.
#[derive(Debug)]
pub struct TrackedReducer<T, E> {
    inner: RequestReducer<T, E>,
}

impl<T, E> TrackedReducer<T, E> {
    /// Create a new tracked reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: RequestReducer::new(),
        }
    }

    /// Run the inner reducer on the request state
    ///
    /// The lifecycle reducer is pure and never returns work to run.
    fn apply(
        &self,
        state: &mut TrackedState<T, E>,
        action: RequestAction<T, E>,
    ) -> SmallVec<[Effect<TrackedAction<T, E>>; 4]> {
        let effects = self.inner.reduce(&mut state.request, action, &());
        debug_assert!(effects.iter().all(Effect::is_none));
        smallvec![Effect::None]
    }
}

impl<T, E> Default for TrackedReducer<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for TrackedReducer<T, E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner }
    }
}

impl<T, E> Reducer for TrackedReducer<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type State = TrackedState<T, E>;
    type Action = TrackedAction<T, E>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TrackedAction::Settle {
                generation,
                outcome,
            } => {
                if generation != state.generation {
                    state.discarded += 1;
                    return smallvec![Effect::None];
                }
                self.apply(state, outcome.into())
            },
            TrackedAction::Begin { generation } => {
                if generation.is_older_than(state.generation) {
                    return smallvec![Effect::None];
                }
                state.generation = generation;
                self.apply(state, RequestAction::Pending)
            },
            TrackedAction::Assign { generation, action } => {
                if generation.is_older_than(state.generation) {
                    return smallvec![Effect::None];
                }
                state.generation = generation;
                self.apply(state, action)
            },
            TrackedAction::Reset { generation } => {
                if !generation.is_older_than(state.generation) {
                    state.generation = generation;
                    state.request = RequestState::Idle;
                }
                smallvec![Effect::None]
            },
        }
    }
}
