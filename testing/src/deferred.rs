//! Operations whose outcome the test controls.
//!
//! [`deferred()`] returns a [`Resolver`] and a [`Deferred`] future. Hand the
//! future to the orchestrator, then settle it from the test at exactly the
//! point the scenario needs. If the resolver is dropped unsettled, the future
//! stays pending forever, like a request that never comes back.

use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

/// Create a linked resolver and deferred operation
#[must_use]
pub fn deferred<T, E>() -> (Resolver<T, E>, Deferred<T, E>) {
    let (tx, rx) = oneshot::channel();
    (Resolver { tx }, Deferred { rx: Some(rx) })
}

/// An operation that settles with `outcome` after `delay`
pub async fn delayed<T, E>(delay: Duration, outcome: Result<T, E>) -> Result<T, E> {
    tokio::time::sleep(delay).await;
    outcome
}

/// Settles the paired [`Deferred`]
#[derive(Debug)]
pub struct Resolver<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Resolver<T, E> {
    /// Succeed with `data`. Returns `false` if the operation was dropped.
    pub fn resolve(self, data: T) -> bool {
        self.settle(Ok(data))
    }

    /// Fail with `error`. Returns `false` if the operation was dropped.
    pub fn reject(self, error: E) -> bool {
        self.settle(Err(error))
    }

    /// Settle with `outcome`. Returns `false` if the operation was dropped.
    pub fn settle(self, outcome: Result<T, E>) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

/// Future half of [`deferred()`]
#[derive(Debug)]
#[must_use = "a deferred operation does nothing unless run"]
pub struct Deferred<T, E> {
    /// `None` once the resolver was dropped unsettled
    rx: Option<oneshot::Receiver<Result<T, E>>>,
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        match rx.poll_unpin(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => {
                // Resolver dropped: never settles
                self.rx = None;
                Poll::Pending
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[tokio::test]
    async fn resolves_with_data() {
        let (resolver, operation) = deferred::<u8, String>();
        assert!(resolver.resolve(7));
        assert_eq!(operation.await, Ok(7));
    }

    #[tokio::test]
    async fn rejects_with_error() {
        let (resolver, operation) = deferred::<u8, String>();
        assert!(resolver.reject("Not Found".to_string()));
        assert_eq!(operation.await, Err("Not Found".to_string()));
    }

    #[tokio::test]
    async fn dropped_resolver_never_settles() {
        let (resolver, operation) = deferred::<u8, String>();
        drop(resolver);

        let result = tokio::time::timeout(Duration::from_millis(20), operation).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dropped_resolver_survives_repeated_polls() {
        let (resolver, mut operation) = deferred::<u8, String>();
        drop(resolver);

        for _ in 0..3 {
            let polled = futures::poll!(&mut operation);
            assert!(polled.is_pending());
        }
    }

    #[tokio::test]
    async fn dropped_resolver_inside_select_keeps_other_branch() {
        let (resolver, operation) = deferred::<u8, String>();
        let mut operation = std::pin::pin!(operation);
        drop(resolver);

        let mut ticks = 0;
        while ticks < 3 {
            tokio::select! {
                _ = &mut operation => panic!("dropped resolver settled the operation"),
                () = tokio::time::sleep(Duration::from_millis(2)) => ticks += 1,
            }
        }
        assert_eq!(ticks, 3);
    }

    #[tokio::test]
    async fn settling_a_dropped_operation_reports_false() {
        let (resolver, operation) = deferred::<u8, String>();
        drop(operation);
        assert!(!resolver.resolve(1));
    }

    #[tokio::test]
    async fn delayed_settles_after_delay() {
        let outcome = delayed::<_, String>(Duration::from_millis(1), Ok("late")).await;
        assert_eq!(outcome.unwrap(), "late");
    }
}
