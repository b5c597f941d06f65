//! Retry loop: run an attempt closure until success, a terminal error, or
//! the attempt budget runs out.

use std::fmt;
use std::time::Duration;

use super::classify;
use super::error::AttemptError;
use super::policy::{RetryDecision, RetryPolicy};

/// Sleep between attempts. Injectable so tests run without real delays.
pub trait Backoff {
    fn wait(&self, delay: Duration);
}

/// Production backoff: blocks the calling thread.
pub struct ThreadSleep;

impl Backoff for ThreadSleep {
    fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Terminal outcome of the retry loop.
#[derive(Debug)]
pub enum RetryError {
    /// A non-transient error; no further attempts were made.
    Fatal(AttemptError),
    /// The attempt budget is spent. `attempts` is the number actually made
    /// (0 when the policy allows none); `last` is the final failure, if any.
    Exhausted {
        attempts: u32,
        last: Option<AttemptError>,
    },
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Fatal(e) => write!(f, "{}", e),
            RetryError::Exhausted { attempts, last } => match last {
                Some(e) => write!(f, "exhausted after {} attempt(s): {}", attempts, e),
                None => write!(f, "exhausted after {} attempt(s)", attempts),
            },
        }
    }
}

impl std::error::Error for RetryError {}

/// Runs `attempt_fn` until it succeeds or the policy says stop.
///
/// `attempt_fn` receives the 1-based attempt number. `on_failure` is called
/// for every failed attempt (for user-facing reporting) before the policy
/// decides whether to sleep and retry. With `policy.max_attempts == 0` the
/// closure is never invoked and the loop exhausts immediately.
pub fn run_with_retry<T, F, R>(
    policy: &RetryPolicy,
    backoff: &dyn Backoff,
    mut on_failure: R,
    mut attempt_fn: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Result<T, AttemptError>,
    R: FnMut(u32, &AttemptError),
{
    let mut attempts = 0u32;
    let mut last = None;
    while attempts < policy.max_attempts {
        let attempt = attempts + 1;
        match attempt_fn(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempts = attempt;
                on_failure(attempt, &e);
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        if !kind.is_transient() {
                            return Err(RetryError::Fatal(e));
                        }
                        last = Some(e);
                        break;
                    }
                    RetryDecision::RetryAfter(delay) => {
                        last = Some(e);
                        backoff.wait(delay);
                    }
                }
            }
        }
    }
    Err(RetryError::Exhausted { attempts, last })
}
