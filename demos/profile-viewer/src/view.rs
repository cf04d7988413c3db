//! The profile view
//!
//! Owns the liveness flag and the request for one mounted view. Each
//! submitted subject restarts the request; unmounting tears the view down
//! before anything else so late responses land nowhere.
//!
//! # Example
//!
//! ```ignore
//! let mut view = ProfileView::mount(client, Subject::parse("octocat"));
//! view.settled(Duration::from_secs(5)).await?;
//! println!("{}", view.present().await.render_text());
//!
//! view.submit("ghost").await;
//! ```

use crate::client::ProfileFetcher;
use crate::error::FetchError;
use crate::presentation::Presentation;
use crate::profile::UserProfile;
use request_lifecycle_core::request::RequestState;
use request_lifecycle_core::subject::Subject;
use request_lifecycle_runtime::liveness::Liveness;
use request_lifecycle_runtime::orchestrator::AsyncRequest;
use request_lifecycle_runtime::{EffectHandle, StoreConfig, StoreError};
use std::time::Duration;

/// Request type driven by the view
pub type ProfileRequest = AsyncRequest<UserProfile, FetchError>;

/// How long an unmounted view's request may take to drain
pub const UNMOUNT_GRACE: Duration = Duration::from_secs(1);

/// A mounted profile view
pub struct ProfileView<F> {
    fetcher: F,
    liveness: Liveness,
    request: ProfileRequest,
    subject: Option<Subject>,
    in_flight: EffectHandle,
}

impl<F> ProfileView<F>
where
    F: ProfileFetcher,
{
    /// Mount the view, starting a fetch if `subject` is given
    pub async fn mount(fetcher: F, subject: Option<Subject>) -> Self {
        let liveness = Liveness::mounted();
        let request = ProfileRequest::with_config(
            subject.is_some(),
            liveness.probe(),
            StoreConfig::default().with_shutdown_timeout(UNMOUNT_GRACE),
        );

        let mut view = Self {
            fetcher,
            liveness,
            request,
            subject: None,
            in_flight: EffectHandle::completed(),
        };

        if let Some(subject) = subject {
            tracing::info!(subject = %subject, "Mounted with subject");
            view.start(subject).await;
        } else {
            tracing::info!("Mounted without subject");
        }
        view
    }

    /// Submit raw form input.
    ///
    /// Restarts the request only when the trimmed subject differs from the
    /// current one; empty input returns to the placeholder. Returns whether
    /// anything changed.
    pub async fn submit(&mut self, raw: &str) -> bool {
        let subject = Subject::parse(raw);
        if subject == self.subject {
            tracing::debug!("Subject unchanged, ignoring submit");
            return false;
        }

        match subject {
            Some(subject) => self.start(subject).await,
            None => {
                tracing::info!("Subject cleared");
                self.subject = None;
                self.in_flight = EffectHandle::completed();
                let _ = self.request.reset().await;
            },
        }
        true
    }

    async fn start(&mut self, subject: Subject) {
        tracing::info!(subject = %subject, "Fetching profile");
        let operation = self.fetcher.fetch(&subject);
        self.subject = Some(subject);
        self.in_flight = self.request.run(operation).await;
    }

    /// The subject currently shown
    #[must_use]
    pub const fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Current request state
    pub async fn state(&self) -> RequestState<UserProfile, FetchError> {
        self.request.snapshot().await
    }

    /// Presentation for the current state
    pub async fn present(&self) -> Presentation {
        Presentation::select(&self.state().await, self.subject.as_ref())
    }

    /// Wait until the latest request has settled (or been dropped)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if it is still running after `timeout`.
    pub async fn settled(&mut self, timeout: Duration) -> Result<(), StoreError> {
        self.in_flight.wait_with_timeout(timeout).await
    }

    /// The underlying request
    #[must_use]
    pub const fn request(&self) -> &ProfileRequest {
        &self.request
    }

    /// Tear the view down.
    ///
    /// Liveness flips first, then the store closes. The returned request can
    /// still be read but never changes again.
    pub fn unmount(self) -> ProfileRequest {
        let Self {
            liveness, request, ..
        } = self;

        liveness.teardown();
        request.close();
        tracing::info!("Unmounted");
        request
    }
}
