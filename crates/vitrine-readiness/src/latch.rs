//! One-way readiness latch.

use tokio::sync::watch;

/// A `Pending → Ready` flag that can be awaited.
///
/// Ready is terminal: firing an already-ready latch does nothing and
/// reports `false`.
#[derive(Debug)]
pub struct ReadyLatch {
    state: watch::Sender<bool>,
}

impl ReadyLatch {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self { state }
    }

    /// Move to Ready. Returns `true` only for the call that made the transition.
    pub fn fire(&self) -> bool {
        self.state.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    pub fn is_ready(&self) -> bool {
        *self.state.borrow()
    }

    /// Wait until the latch is Ready. Returns immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadyLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;

    #[test]
    fn test_fire_once() {
        let latch = ReadyLatch::new();
        assert!(!latch.is_ready());
        assert!(latch.fire());
        assert!(latch.is_ready());
        assert!(!latch.fire());
        assert!(latch.is_ready());
    }

    #[tokio::test]
    async fn test_wait_after_ready_returns() {
        let latch = ReadyLatch::new();
        latch.fire();
        latch.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_wake_on_fire() {
        let latch = Arc::new(ReadyLatch::new());
        let waiter = {
            let latch = latch.clone();
            tokio::spawn(async move { latch.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        latch.fire();
        waiter.await.expect("waiter");
    }
}
