//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.
//! Several actions may be queued with [`ReducerTest::when_actions`]; assertions see the
//! state after the last one and the effects it returned.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use request_lifecycle_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use request_lifecycle_core::request::{RequestAction, RequestReducer, RequestState};
/// use request_lifecycle_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(RequestReducer::<u32, String>::new())
///     .with_env(())
///     .given_state(RequestState::Idle)
///     .when_action(RequestAction::Pending)
///     .then_state(|state| assert!(state.is_pending()))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Queue several actions, applied in order (When)
    #[must_use]
    pub fn when_actions<I>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
    {
        self.actions.extend(actions);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, actions, or environment are not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        // Execute reducer; only the last action's effects are kept
        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }

        // Run effect assertions
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects and request states
pub mod assertions {
    use request_lifecycle_core::effect::Effect;
    use request_lifecycle_core::request::{RequestState, RequestStatus};

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that a request state has the given status and only the fields it owns
    ///
    /// # Panics
    ///
    /// Panics if the status differs, or data or error is present outside its status.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_status<T, E>(state: &RequestState<T, E>, expected: RequestStatus) {
        assert_eq!(state.status(), expected, "Unexpected request status");
        assert_eq!(
            state.data().is_some(),
            expected == RequestStatus::Resolved,
            "data present outside Resolved"
        );
        assert_eq!(
            state.error().is_some(),
            expected == RequestStatus::Rejected,
            "error present outside Rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use request_lifecycle_core::request::{RequestAction, RequestReducer, RequestState, RequestStatus};
    use request_lifecycle_core::subject::Generation;
    use request_lifecycle_core::tracked::{TrackedAction, TrackedReducer, TrackedState};

    type Action = RequestAction<u32, String>;

    #[test]
    fn test_pending_clears_data() {
        ReducerTest::new(RequestReducer::new())
            .with_env(())
            .given_state(RequestState::Resolved { data: 3u32 })
            .when_action(Action::Pending)
            .then_state(|state| assertions::assert_status(state, RequestStatus::Pending))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_rejected_after_resolved() {
        ReducerTest::new(RequestReducer::new())
            .with_env(())
            .given_state(RequestState::Idle)
            .when_actions([
                Action::Pending,
                Action::Resolved { data: 1 },
                Action::Rejected {
                    error: "Not Found".to_string(),
                },
            ])
            .then_state(|state| {
                assertions::assert_status(state, RequestStatus::Rejected);
                assert_eq!(state.error().map(String::as_str), Some("Not Found"));
            })
            .run();
    }

    #[test]
    fn test_tracked_stale_settle() {
        ReducerTest::new(TrackedReducer::<u32, String>::new())
            .with_env(())
            .given_state(TrackedState::mounted(true))
            .when_actions([
                TrackedAction::Begin {
                    generation: Generation::new(1),
                },
                TrackedAction::Begin {
                    generation: Generation::new(2),
                },
                TrackedAction::Settle {
                    generation: Generation::new(1),
                    outcome: Ok(10),
                },
            ])
            .then_state(|state| {
                assertions::assert_status(state.request(), RequestStatus::Pending);
                assert_eq!(state.discarded(), 1);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<Action>(&[Effect::None]);
        assertions::assert_no_effects::<Action>(&[]);
    }

    #[test]
    fn test_assertions_future_effect() {
        let effects = [Effect::<Action>::future(async { None })];
        assertions::assert_has_future_effect(&effects);
        assertions::assert_effects_count(&effects, 1);
    }

    #[test]
    #[should_panic(expected = "At least one action")]
    fn test_missing_action_panics() {
        ReducerTest::new(RequestReducer::<u32, String>::new())
            .with_env(())
            .given_state(RequestState::Idle)
            .run();
    }
}
