//! Bounded retry with a fixed delay
//!
//! Used by the file sink to ride out short external locks on the log file.

use std::thread;
use std::time::Duration;

use tracing::debug;

/// Default number of attempts for a file append
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// How often, and how far apart, an operation is attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least one is always made)
    pub attempts: u32,
    /// Sleep between two consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a retry policy
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Number of attempts that [`RetryPolicy::run`] actually makes
    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Run `op` until it succeeds or the attempts are used up
    ///
    /// Returns the first success, or the error of the last attempt.
    pub fn run<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.effective_attempts();
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    debug!(attempt, attempts, error = %e, "Attempt failed, retrying");
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
