//! Bounded polling.

use std::time::Duration;

use tokio::time::{sleep, timeout};

/// How a poll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The check returned `true`.
    Satisfied { attempts: u32 },
    /// The attempt budget ran out.
    Exhausted { attempts: u32 },
    /// The deadline passed first.
    TimedOut,
}

impl PollOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Re-checks a condition at a fixed interval until it holds or a bound is hit.
///
/// The check runs immediately and then once per interval. A poll with
/// neither bound set only ends when the check succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedPoll {
    interval: Duration,
    max_attempts: Option<u32>,
    deadline: Option<Duration>,
}

impl BoundedPoll {
    /// Poll every `interval`, unbounded until limits are added.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
            deadline: None,
        }
    }

    /// Stop after `attempts` checks.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// Stop once `deadline` has elapsed.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether this poll is guaranteed to terminate.
    pub fn is_bounded(&self) -> bool {
        self.max_attempts.is_some() || self.deadline.is_some()
    }

    /// Run the poll.
    pub async fn run<F>(&self, mut check: F) -> PollOutcome
    where
        F: FnMut() -> bool,
    {
        let attempts_loop = async {
            let mut attempts = 0;
            loop {
                attempts += 1;
                if check() {
                    return PollOutcome::Satisfied { attempts };
                }
                if self.max_attempts.is_some_and(|max| attempts >= max) {
                    return PollOutcome::Exhausted { attempts };
                }
                sleep(self.interval).await;
            }
        };

        match self.deadline {
            Some(deadline) => timeout(deadline, attempts_loop)
                .await
                .unwrap_or(PollOutcome::TimedOut),
            None => attempts_loop.await,
        }
    }
}
