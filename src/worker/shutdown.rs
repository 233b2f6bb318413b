//! Cooperative shutdown signaling for worker loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cloneable token used to request and observe graceful shutdown
///
/// The worker checks the token at iteration boundaries and selects against
/// [`ShutdownToken::requested`] inside its sleeps, so shutdown interrupts a
/// sleeping loop promptly while an in-flight batch always drains first.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<ShutdownInner>,
}

#[derive(Debug, Default)]
struct ShutdownInner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter. Idempotent.
    pub fn request(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check whether shutdown has been requested
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested.
    ///
    /// Registers the waiter before re-checking the flag so a request racing
    /// this call is never missed.
    pub async fn requested(&self) {
        loop {
            if self.is_requested() {
                return;
            }
            let notified = self.inner.notify.notified();
            if self.is_requested() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn starts_unrequested() {
        let token = ShutdownToken::new();
        assert!(!token.is_requested());
    }

    #[tokio::test]
    async fn request_is_visible_to_clones() {
        let token = ShutdownToken::new();
        let clone = token.clone();

        token.request();
        token.request();

        assert!(clone.is_requested());
    }

    #[tokio::test]
    async fn requested_resolves_for_waiters() {
        let token = ShutdownToken::new();
        let waiter = token.clone();

        let handle = tokio::spawn(async move { waiter.requested().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.request();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Waiter did not observe shutdown")
            .expect("Waiter task panicked");
    }

    #[tokio::test]
    async fn requested_resolves_immediately_after_the_fact() {
        let token = ShutdownToken::new();
        token.request();

        tokio::time::timeout(Duration::from_millis(100), token.requested())
            .await
            .expect("Pre-requested token should resolve immediately");
    }
}
