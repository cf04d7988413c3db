//! Request states, events, and the lifecycle reducer.
//!
//! [`RequestState`] collapses the four presentations of a single request into
//! one discriminated value. Each variant owns exactly the fields that make
//! sense for it, so a transition can never leave data or an error behind from
//! a previous cycle.
//!
//! [`RequestReducer`] materializes whichever variant the incoming
//! [`RequestAction`] names. It never consults the prior state.

use crate::effect::Effect;
use crate::reducer::Reducer;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a status string does not name one of the four request states.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unhandled request status: {0}")]
pub struct UnknownStatus(pub String);

/// Discriminant of a [`RequestState`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// No subject submitted yet
    Idle,
    /// Waiting for the deferred operation to settle
    Pending,
    /// The last request succeeded
    Resolved,
    /// The last request failed
    Rejected,
}

impl RequestStatus {
    /// Lowercase name used in logs and serialized state
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a request has completed (successfully or not)
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// State of one logical request.
///
/// At most one of `data` and `error` exists, and only in the variant that
/// owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RequestState<T, E> {
    /// No subject submitted yet
    Idle,
    /// A subject was submitted and awaits resolution
    Pending,
    /// The last completed request succeeded
    Resolved {
        /// The operation's result
        data: T,
    },
    /// The last completed request failed
    Rejected {
        /// The operation's failure, passed through unmodified
        error: E,
    },
}

impl<T, E> RequestState<T, E> {
    /// State at mount: `Pending` when a subject was supplied, `Idle` otherwise
    #[must_use]
    pub const fn initial(has_subject: bool) -> Self {
        if has_subject { Self::Pending } else { Self::Idle }
    }

    /// The discriminant of this state
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        match self {
            Self::Idle => RequestStatus::Idle,
            Self::Pending => RequestStatus::Pending,
            Self::Resolved { .. } => RequestStatus::Resolved,
            Self::Rejected { .. } => RequestStatus::Rejected,
        }
    }

    /// Result data, present only when `Resolved`
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Resolved { data } => Some(data),
            _ => None,
        }
    }

    /// Failure, present only when `Rejected`
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected { error } => Some(error),
            _ => None,
        }
    }

    /// Check if no subject has been submitted
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if a request is in flight
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check if the last request succeeded
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Check if the last request failed
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Events accepted by [`RequestReducer`].
///
/// The set is closed: an event outside it cannot be constructed, and when
/// events arrive as serialized data an unknown `type` fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequestAction<T, E> {
    /// A request started; clears data and error
    Pending,
    /// A request succeeded with `data`
    Resolved {
        /// The operation's result
        data: T,
    },
    /// A request failed with `error`
    Rejected {
        /// The operation's failure
        error: E,
    },
}

impl<T, E> RequestAction<T, E> {
    /// The status this event moves the state to
    #[must_use]
    pub const fn target_status(&self) -> RequestStatus {
        match self {
            Self::Pending => RequestStatus::Pending,
            Self::Resolved { .. } => RequestStatus::Resolved,
            Self::Rejected { .. } => RequestStatus::Rejected,
        }
    }
}

impl<T, E> From<Result<T, E>> for RequestAction<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Resolved { data },
            Err(error) => Self::Rejected { error },
        }
    }
}

/// The lifecycle reducer.
///
/// Generic over the data type `T` and error type `E`.
#[derive(Debug)]
pub struct RequestReducer<T, E> {
    _phantom: std::marker::PhantomData<fn() -> (T, E)>,
}

impl<T, E> RequestReducer<T, E> {
    /// Create a new lifecycle reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T, E> Default for RequestReducer<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for RequestReducer<T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for RequestReducer<T, E> {}

impl<T, E> Reducer for RequestReducer<T, E> {
    type State = RequestState<T, E>;
    type Action = RequestAction<T, E>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        *state = match action {
            RequestAction::Pending => RequestState::Pending,
            RequestAction::Resolved { data } => RequestState::Resolved { data },
            RequestAction::Rejected { error } => RequestState::Rejected { error },
        };

        smallvec![Effect::None]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    type State = RequestState<String, String>;
    type Action = RequestAction<String, String>;

    fn reduce(state: &mut State, action: Action) {
        let effects = RequestReducer::new().reduce(state, action, &());
        assert_eq!(effects.len(), 1);
        assert!(effects[0].is_none());
    }

    #[test]
    fn initial_state_depends_on_subject() {
        assert_eq!(State::initial(false), State::Idle);
        assert_eq!(State::initial(true), State::Pending);
        assert_eq!(State::default(), State::Idle);
    }

    #[test]
    fn pending_clears_previous_data() {
        let mut state = State::Resolved {
            data: "old".to_string(),
        };
        reduce(&mut state, Action::Pending);

        assert_eq!(state.status(), RequestStatus::Pending);
        assert!(state.data().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn resolved_clears_previous_error() {
        let mut state = State::Rejected {
            error: "boom".to_string(),
        };
        reduce(
            &mut state,
            Action::Resolved {
                data: "fresh".to_string(),
            },
        );

        assert!(state.is_resolved());
        assert_eq!(state.data().unwrap(), "fresh");
        assert!(state.error().is_none());
    }

    #[test]
    fn rejected_clears_previous_data() {
        let mut state = State::Resolved {
            data: "stale".to_string(),
        };
        reduce(
            &mut state,
            Action::Rejected {
                error: "Not Found".to_string(),
            },
        );

        assert!(state.is_rejected());
        assert_eq!(state.error().unwrap(), "Not Found");
        assert!(state.data().is_none());
    }

    #[test]
    fn transitions_ignore_prior_status() {
        for start in [
            State::Idle,
            State::Pending,
            State::Resolved { data: "x".into() },
            State::Rejected { error: "y".into() },
        ] {
            let mut state = start;
            reduce(&mut state, Action::Resolved { data: "d".into() });
            assert_eq!(state, State::Resolved { data: "d".into() });
        }
    }

    #[test]
    fn result_converts_to_action() {
        let ok: Action = Ok::<_, String>("yes".to_string()).into();
        let err: Action = Err::<String, _>("no".to_string()).into();

        assert_eq!(ok.target_status(), RequestStatus::Resolved);
        assert_eq!(err, Action::Rejected { error: "no".into() });
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            RequestStatus::Idle,
            RequestStatus::Pending,
            RequestStatus::Resolved,
            RequestStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<RequestStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = "loading".parse::<RequestStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("loading".to_string()));
        assert_eq!(err.to_string(), "Unhandled request status: loading");
    }

    #[test]
    fn unknown_action_type_fails_to_deserialize() {
        let result = serde_json::from_str::<Action>(r#"{"type":"cancelled"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let state = State::Rejected {
            error: "Not Found".into(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["error"], "Not Found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn settled_statuses() {
        assert!(RequestStatus::Resolved.is_settled());
        assert!(RequestStatus::Rejected.is_settled());
        assert!(!RequestStatus::Pending.is_settled());
        assert!(!RequestStatus::Idle.is_settled());
    }
}
