//! One presentation per request status
//!
//! The view reads the request state after every transition and picks
//! exactly one of four presentations. HTML output escapes every
//! interpolated value, so error text from the network is shown as text.

use crate::config::OutputFormat;
use crate::error::FetchError;
use crate::profile::UserProfile;
use request_lifecycle_core::request::RequestState;
use request_lifecycle_core::subject::Subject;
use std::fmt::Write as _;

/// Shown before any subject is submitted
pub const PLACEHOLDER: &str = "Submit user";

/// Heading above a failure message
pub const FAILURE_HEADING: &str = "There was an error";

/// What the view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// No subject yet
    Placeholder,
    /// Fallback card while the profile loads
    Loading(UserProfile),
    /// The fetched profile
    Profile(UserProfile),
    /// The failure message, unmodified
    Failure(String),
}

impl Presentation {
    /// Select the presentation for `state`; `subject` fills the loading card
    #[must_use]
    pub fn select(state: &RequestState<UserProfile, FetchError>, subject: Option<&Subject>) -> Self {
        match state {
            RequestState::Idle => Self::Placeholder,
            RequestState::Pending => match subject {
                Some(subject) => Self::Loading(UserProfile::fallback(subject)),
                None => Self::Placeholder,
            },
            RequestState::Resolved { data } => Self::Profile(data.clone()),
            RequestState::Rejected { error } => Self::Failure(error.to_string()),
        }
    }

    /// Render in the given format
    #[must_use]
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Html => self.render_html(),
        }
    }

    /// Plain text for the terminal
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Self::Placeholder => PLACEHOLDER.to_string(),
            Self::Loading(profile) | Self::Profile(profile) => text_card(profile),
            Self::Failure(message) => format!("{FAILURE_HEADING}\n{message}"),
        }
    }

    /// HTML fragment with all values escaped
    #[must_use]
    pub fn render_html(&self) -> String {
        match self {
            Self::Placeholder => format!("<p>{PLACEHOLDER}</p>"),
            Self::Loading(profile) | Self::Profile(profile) => html_card(profile),
            Self::Failure(message) => format!(
                "<div>{FAILURE_HEADING}<pre style=\"white-space: normal\">{}</pre></div>",
                escape(message)
            ),
        }
    }
}

fn text_card(profile: &UserProfile) -> String {
    let mut out = format!("{} (@{})", profile.display_name(), profile.login);
    if let Some(bio) = profile.bio.as_deref().filter(|bio| !bio.is_empty()) {
        let _ = write!(out, "\n{bio}");
    }
    let _ = write!(
        out,
        "\nFollowers: {} | Repos: {}\nAvatar: {}",
        profile.followers, profile.public_repos, profile.avatar_url
    );
    if let Some(created_at) = profile.created_at {
        let _ = write!(out, "\nJoined: {}", created_at.format("%Y-%m-%d"));
    }
    out
}

fn html_card(profile: &UserProfile) -> String {
    let name = escape(profile.display_name());
    let mut out = String::from("<div class=\"user-card\">");
    let _ = write!(
        out,
        "<img src=\"{}\" alt=\"{name}\" /><h2>{name}</h2>",
        escape(&profile.avatar_url)
    );
    if let Some(bio) = profile.bio.as_deref() {
        let _ = write!(out, "<p>{}</p>", escape(bio));
    }
    let _ = write!(
        out,
        "<ul><li>Followers: {}</li><li>Repos: {}</li></ul></div>",
        profile.followers, profile.public_repos
    );
    out
}

fn escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}
