//! Property-based testing utilities using proptest.
//!
//! Strategies are generic over the payload types so each test picks its own
//! data and error generators.

use proptest::prelude::*;
use request_lifecycle_core::request::{RequestAction, RequestState};
use request_lifecycle_core::subject::Subject;
use std::fmt::Debug;

/// Any lifecycle event
pub fn request_action<T, E>(
    data: impl Strategy<Value = T>,
    error: impl Strategy<Value = E>,
) -> impl Strategy<Value = RequestAction<T, E>>
where
    T: Clone + Debug,
    E: Clone + Debug,
{
    prop_oneof![
        Just(RequestAction::Pending),
        data.prop_map(|data| RequestAction::Resolved { data }),
        error.prop_map(|error| RequestAction::Rejected { error }),
    ]
}

/// Any request state
pub fn request_state<T, E>(
    data: impl Strategy<Value = T>,
    error: impl Strategy<Value = E>,
) -> impl Strategy<Value = RequestState<T, E>>
where
    T: Clone + Debug,
    E: Clone + Debug,
{
    prop_oneof![
        Just(RequestState::Idle),
        Just(RequestState::Pending),
        data.prop_map(|data| RequestState::Resolved { data }),
        error.prop_map(|error| RequestState::Rejected { error }),
    ]
}

/// Login-shaped subjects
pub fn subject() -> impl Strategy<Value = Subject> {
    "[a-z][a-z0-9-]{0,15}".prop_filter_map("blank subject", |raw| Subject::parse(&raw))
}

/// Raw form input: logins with stray whitespace, or nothing at all
pub fn raw_input() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t]{1,3}",
        "[ ]{0,2}[a-z][a-z0-9-]{0,15}[ ]{0,2}",
    ]
}

/// Settle order of `count` overlapping requests, numbered from 1
pub fn settle_order(count: u64) -> impl Strategy<Value = Vec<u64>> {
    Just((1..=count).collect::<Vec<_>>()).prop_shuffle()
}
