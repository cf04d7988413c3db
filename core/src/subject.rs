//! Request subjects and generation tickets.
//!
//! A [`Subject`] is the identifier a request is made for. A [`Generation`] is
//! stamped on every lifecycle restart; a result carrying an older generation
//! than the current one belongs to a superseded subject and must not be applied.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier that parameterizes one request cycle (e.g. a user login).
///
/// Always trimmed and non-empty. Use [`Subject::parse`] to build one from
/// free-form input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Subject(String);

impl Subject {
    /// Parse raw input into a subject.
    ///
    /// Returns `None` when the input is empty or only whitespace, meaning
    /// "no subject".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The subject as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the subject, returning the inner string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic ticket identifying one request cycle.
///
/// `Generation::INITIAL` belongs to the state created at mount; every restart
/// uses a strictly greater value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    /// Generation of the state created at mount
    pub const INITIAL: Self = Self(0);

    /// Create a generation from a raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The generation after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Whether `self` was issued before `other`
    #[must_use]
    pub const fn is_older_than(self, other: Self) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_input() {
        let subject = Subject::parse("  octocat \n");
        assert_eq!(subject.as_ref().map(Subject::as_str), Some("octocat"));
    }

    #[test]
    fn blank_input_is_no_subject() {
        assert_eq!(Subject::parse(""), None);
        assert_eq!(Subject::parse("   \t"), None);
    }

    #[test]
    fn subject_display() {
        let subject = Subject::parse("ghost");
        assert_eq!(subject.map(|s| s.to_string()), Some("ghost".to_string()));
    }

    #[test]
    fn generations_are_ordered() {
        let first = Generation::INITIAL.next();
        let second = first.next();

        assert!(Generation::INITIAL.is_older_than(first));
        assert!(first.is_older_than(second));
        assert!(!second.is_older_than(first));
        assert!(!first.is_older_than(first));
        assert_eq!(second.value(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn next_saturates() {
        let last = Generation::new(u64::MAX);
        assert_eq!(last.next(), last);
    }
}
