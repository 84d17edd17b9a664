//! Bounded Polling
//!
//! Every wait in the oracle is a bounded retry with a fixed sleep between
//! checks. Uses the tokio clock so tests can run it on paused time.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::error::{MetamorphError, Result};

/// Default spacing between checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Repeats a check until it yields a value or the timeout elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Poller {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Run `check` until it returns `Ok(Some(_))`.
    ///
    /// The check always runs at least once. `Ok(None)` means "not yet"; an
    /// `Err` aborts the wait immediately. On expiry the result is
    /// [`MetamorphError::Timeout`] and at least `timeout` has elapsed.
    pub async fn until<T, F, Fut>(&self, what: &str, mut check: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if let Some(value) = check().await? {
                trace!(what, attempts, elapsed = ?started.elapsed(), "condition met");
                return Ok(value);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(MetamorphError::Timeout {
                    what: what.to_string(),
                    timeout: self.timeout,
                });
            }

            // Clamped to the deadline; the 1 ms floor keeps a spent budget from spinning.
            sleep(self.interval.min(deadline - now).max(Duration::from_millis(1))).await;
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: Duration::from_secs(10),
        }
    }
}
