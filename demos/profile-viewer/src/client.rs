//! GitHub users API client

use crate::config::ViewerConfig;
use crate::error::FetchError;
use crate::profile::UserProfile;
use reqwest::{Client, StatusCode, Url};
use request_lifecycle_core::subject::Subject;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Fetches the profile for a subject
///
/// The returned future owns everything it needs, so it can outlive the call
/// and run in the background.
pub trait ProfileFetcher: Send + Sync {
    /// Start fetching the profile for `subject`
    fn fetch(
        &self,
        subject: &Subject,
    ) -> Pin<Box<dyn Future<Output = Result<UserProfile, FetchError>> + Send + 'static>>;
}

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GitHub REST API client
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: Url,
}

impl GithubClient {
    /// Create a client for `api_url`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if `api_url` is not a valid base URL or
    /// the HTTP client cannot be built
    pub fn new(
        api_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let api_url = api_url.into();
        let api_url = Url::parse(&api_url)
            .map_err(|e| FetchError::Request(format!("invalid API URL {api_url}: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(FetchError::Request(format!(
                "API URL cannot be a base: {api_url}"
            )));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, api_url })
    }

    /// `{api_url}/users/{login}`, with `login` encoded as a single path segment
    fn user_url(&self, login: &str) -> Result<Url, FetchError> {
        // Dot segments are dropped by the URL builder; no login looks like one
        if matches!(login, "." | "..") {
            return Err(FetchError::NotFound);
        }
        let mut url = self.api_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| FetchError::Request(format!("API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .push("users")
            .push(login);
        Ok(url)
    }

    /// Create a client from viewer configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` if the HTTP client cannot be built
    pub fn from_config(config: &ViewerConfig) -> Result<Self, FetchError> {
        Self::new(config.api_url.as_str(), &config.user_agent, config.timeout())
    }

    /// Get a user by login
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    #[tracing::instrument(skip(self), name = "github_get_user")]
    pub async fn get_user(&self, login: &str) -> Result<UserProfile, FetchError> {
        let response = self
            .client
            .get(self.user_url(login)?)
            .header("accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "GitHub responded");

        match status {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str::<UserProfile>(&body)
                    .map_err(|e| FetchError::Decode(e.to_string()))
            },
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
            StatusCode::FORBIDDEN if rate_limit_exhausted(&response) => {
                Err(FetchError::RateLimited)
            },
            status => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map_or(body, |parsed| parsed.message);
                Err(FetchError::Api {
                    status: status.as_u16(),
                    message,
                })
            },
        }
    }
}

/// GitHub signals an exhausted quota with 403 and a zero remaining count
fn rate_limit_exhausted(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|value| value.to_str().ok())
        == Some("0")
}

impl ProfileFetcher for GithubClient {
    fn fetch(
        &self,
        subject: &Subject,
    ) -> Pin<Box<dyn Future<Output = Result<UserProfile, FetchError>> + Send + 'static>> {
        let client = self.clone();
        let login = subject.as_str().to_string();
        Box::pin(async move { client.get_user(&login).await })
    }
}
