//! Mount-scoped liveness.
//!
//! A view owns exactly one [`Liveness`]. It starts mounted and flips to torn
//! down exactly once, either through [`Liveness::teardown`] or when the owner
//! is dropped. Anything that might outlive the view holds a
//! [`LivenessProbe`] instead, which can read the flag but never set it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner side of the mount flag.
///
/// Not `Clone`: only the view that created it can tear it down.
#[derive(Debug)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    /// A flag in the mounted state
    #[must_use]
    pub fn mounted() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the owning view is still mounted
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// A read-only handle to hand to deferred work
    #[must_use]
    pub fn probe(&self) -> LivenessProbe {
        LivenessProbe {
            alive: Arc::clone(&self.alive),
        }
    }

    /// Mark the view torn down. Irreversible.
    pub fn teardown(self) {
        self.mark_torn_down();
    }

    fn mark_torn_down(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            tracing::debug!("View torn down");
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::mounted()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.mark_torn_down();
    }
}

/// Read-only view of a [`Liveness`] flag.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    alive: Arc<AtomicBool>,
}

impl LivenessProbe {
    /// Whether the owning view is still mounted
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// A probe that reports torn down from the start
    ///
    /// Useful for asserting suppression without building a view.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(false)),
        }
    }
}
