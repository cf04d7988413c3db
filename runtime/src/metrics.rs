//! Prometheus metrics for observability and monitoring.
//!
//! This module describes the metrics recorded by the runtime:
//! - Store command processing and reducer timing
//! - Effect execution
//! - Guarded dispatch suppression
//! - Request lifecycle (started, settled, stale results)
//!
//! # Example
//!
//! ```rust,no_run
//! use request_lifecycle_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Serve metrics on port 9090
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! // Metrics available at http://localhost:9090/metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics server.
///
/// With an address, exposes metrics on an HTTP endpoint for Prometheus
/// scraping. Without one, only installs the recorder so [`render`](Self::render)
/// works in-process.
pub struct MetricsServer {
    addr: Option<SocketAddr>,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a metrics server bound to `addr` (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr: Some(addr),
            handle: None,
        }
    }

    /// Create a recorder-only server with no HTTP endpoint
    #[must_use]
    pub const fn in_process() -> Self {
        Self {
            addr: None,
            handle: None,
        }
    }

    /// Initialize metrics and, if an address was given, start the HTTP listener.
    ///
    /// Must be called from within a tokio runtime when an address is set.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or the recorder cannot be installed.
    ///
    /// # Note
    ///
    /// If a metrics recorder is already installed (e.g., in tests), this logs a
    /// warning and leaves [`handle`](Self::handle) empty.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            // Configure histogram buckets for latency measurements
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        let Some(addr) = self.addr else {
            return match builder.install_recorder() {
                Ok(handle) => {
                    self.handle = Some(handle);
                    tracing::debug!("Metrics recorder installed");
                    Ok(())
                },
                Err(e) => Self::already_installed(&e.to_string()),
            };
        };

        let (recorder, exporter) = builder
            .with_http_listener(addr)
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;
        let handle = recorder.handle();

        if metrics::set_global_recorder(recorder).is_err() {
            return Self::already_installed("metrics recorder already initialized");
        }

        tokio::spawn(async move {
            if exporter.await.is_err() {
                tracing::error!("Metrics HTTP listener stopped");
            }
        });

        self.handle = Some(handle);
        tracing::info!(
            addr = %addr,
            "Metrics server started - available at http://{}/metrics",
            addr
        );
        Ok(())
    }

    fn already_installed(message: &str) -> Result<(), MetricsError> {
        if message.contains("already initialized") {
            tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
            Ok(())
        } else {
            Err(MetricsError::Install(message.to_string()))
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the server hasn't been started.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store
    describe_counter!("store.commands.total", "Total number of actions processed by stores");
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to run the reducer for one action"
    );
    describe_counter!("store.effects.executed", "Effects executed, labelled by type");
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was closed"
    );

    // Guarded dispatch
    describe_counter!(
        "dispatch.suppressed",
        "Updates dropped because the owning view was torn down"
    );

    // Request lifecycle
    describe_counter!("request.started", "Request cycles started by run()");
    describe_counter!("request.settled", "Deferred operations settled, labelled by outcome");
    describe_counter!(
        "request.stale_discarded",
        "Settled results dropped because a newer cycle had started"
    );
}

/// Request lifecycle metrics recorder.
pub struct RequestMetrics;

impl RequestMetrics {
    /// Record a new request cycle.
    pub fn record_started() {
        counter!("request.started").increment(1);
    }

    /// Record a settled deferred operation.
    pub fn record_settled(resolved: bool) {
        let outcome = if resolved { "resolved" } else { "rejected" };
        counter!("request.settled", "outcome" => outcome).increment(1);
    }

    /// Record a result dropped for staleness.
    pub fn record_stale_discarded() {
        counter!("request.stale_discarded").increment(1);
    }
}
