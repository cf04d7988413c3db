//! # Request Lifecycle Testing
//!
//! Testing utilities for the request lifecycle.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`deferred()`]: operations that settle when the test says so
//! - [`properties`]: proptest strategies for lifecycle types
//! - [`helpers`]: mounting and waiting shortcuts for orchestrator tests
//!
//! ## Example
//!
//! ```ignore
//! use request_lifecycle_testing::{deferred, helpers};
//!
//! #[tokio::test]
//! async fn pending_until_settled() {
//!     let (liveness, request) = helpers::mount::<String, String>(true);
//!     let (resolver, operation) = deferred();
//!
//!     let mut handle = request.run(operation).await;
//!     assert!(request.snapshot().await.is_pending());
//!
//!     resolver.resolve("octocat".to_string());
//!     helpers::settle(&mut handle).await;
//!     assert!(request.snapshot().await.is_resolved());
//!     drop(liveness);
//! }
//! ```

/// Controllable deferred operations
pub mod deferred;

/// Fluent reducer tests
pub mod reducer_test;

/// Proptest strategies for lifecycle types
pub mod properties;

/// Test helpers and utilities
pub mod helpers {
    use request_lifecycle_runtime::EffectHandle;
    use request_lifecycle_runtime::liveness::Liveness;
    use request_lifecycle_runtime::orchestrator::AsyncRequest;
    use std::time::Duration;

    /// How long [`settle`] waits before failing the test
    pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

    /// A mounted view's liveness together with its request
    #[must_use]
    pub fn mount<T, E>(has_subject: bool) -> (Liveness, AsyncRequest<T, E>)
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let liveness = Liveness::mounted();
        let request = AsyncRequest::new(has_subject, liveness.probe());
        (liveness, request)
    }

    /// Wait for every effect behind `handle`
    ///
    /// # Panics
    ///
    /// Panics if the effects are still running after [`SETTLE_TIMEOUT`].
    #[allow(clippy::panic)] // Test helper
    pub async fn settle(handle: &mut EffectHandle) {
        if handle.wait_with_timeout(SETTLE_TIMEOUT).await.is_err() {
            panic!("effects still running after {SETTLE_TIMEOUT:?}");
        }
    }
}

/// Install a test-writer tracing subscriber once per process
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok();
}

// Re-export commonly used items
pub use deferred::{deferred, delayed, Deferred, Resolver};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }

    #[tokio::test]
    async fn mount_starts_from_subject() {
        let (liveness, request) = helpers::mount::<u8, u8>(false);
        assert!(liveness.is_alive());
        assert!(request.snapshot().await.is_idle());
    }
}
