//! GitHub user profile

use chrono::{DateTime, Utc};
use request_lifecycle_core::subject::Subject;
use serde::{Deserialize, Serialize};

/// Avatar shown while a profile is loading
pub const FALLBACK_AVATAR: &str = "/img/github.png";

/// Bio shown while a profile is loading
pub const LOADING_BIO: &str = "loading...";

/// The subset of `GET /users/{login}` the viewer displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login handle
    pub login: String,
    /// Display name, if the user set one
    #[serde(default)]
    pub name: Option<String>,
    /// Bio, if the user set one
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: String,
    /// Follower count
    #[serde(default)]
    pub followers: u64,
    /// Public repository count
    #[serde(default)]
    pub public_repos: u64,
    /// Account creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Placeholder card shown while the profile for `subject` is loading
    #[must_use]
    pub fn fallback(subject: &Subject) -> Self {
        Self {
            login: subject.to_string(),
            name: Some(subject.to_string()),
            bio: Some(LOADING_BIO.to_string()),
            avatar_url: FALLBACK_AVATAR.to_string(),
            followers: 0,
            public_repos: 0,
            created_at: None,
        }
    }

    /// Name if set, otherwise the login
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}
