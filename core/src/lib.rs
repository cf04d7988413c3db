//! # Request Lifecycle Core
//!
//! Pure state machine for a single asynchronous request.
//!
//! A view that fetches one record at a time shows one of four mutually
//! exclusive states: nothing requested yet, waiting, success, or failure.
//! This crate models those states as a sum type and drives them with a
//! reducer, so combinations like "data and error both set" cannot exist.
//!
//! ## Core Concepts
//!
//! - **State**: [`request::RequestState`], one of `Idle`, `Pending`, `Resolved`, `Rejected`
//! - **Action**: [`request::RequestAction`], the events that move between states
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution), run by the runtime crate
//! - **Generation**: [`subject::Generation`], the ticket that tells a current result from a stale one
//!
//! ## Example
//!
//! ```
//! use request_lifecycle_core::reducer::Reducer;
//! use request_lifecycle_core::request::{RequestAction, RequestReducer, RequestState, RequestStatus};
//!
//! let reducer = RequestReducer::<String, String>::new();
//! let mut state = RequestState::initial(true);
//! assert_eq!(state.status(), RequestStatus::Pending);
//!
//! reducer.reduce(&mut state, RequestAction::Resolved { data: "octocat".to_string() }, &());
//! assert_eq!(state.data().map(String::as_str), Some("octocat"));
//! assert!(state.error().is_none());
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Request states, events, and the lifecycle reducer
pub mod request;

/// Request subjects and generation tickets
pub mod subject;

/// Staleness-aware wrapper around the lifecycle reducer
pub mod tracked;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for ToggleReducer {
    ///     type State = bool;
    ///     type Action = ToggleAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut bool,
    ///         action: ToggleAction,
    ///         _env: &(),
    ///     ) -> SmallVec<[Effect<ToggleAction>; 4]> {
    ///         *state = !*state;
    ///         smallvec![Effect::None]
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers (or built by an orchestrator) and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation as an effect
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Whether this effect does nothing
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Self::None)
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}
