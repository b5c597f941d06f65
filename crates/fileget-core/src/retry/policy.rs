use std::time::Duration;

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused, DNS, reset).
    Connection,
    /// TLS handshake or certificate verification failure.
    Tls,
    /// HTTP error status (client or server; both count as failed attempts).
    HttpStatus(u16),
    /// Any other error; never retried.
    Other,
}

impl ErrorKind {
    /// True for kinds the policy is willing to retry.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-interval retry policy.
///
/// `max_attempts` is the EXACT number of attempts made, not a cap on
/// retries after a first try: 0 means the transfer is never attempted.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts.
    pub max_attempts: u32,
    /// Fixed wait between failed attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after a failed attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Transient kinds retry
    /// with the fixed backoff until the attempt budget is used up;
    /// `ErrorKind::Other` never retries.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if !kind.is_transient() {
            return RetryDecision::NoRetry;
        }
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff)
    }
}
