//! Retry and backoff policy for the HTTP transport.
//!
//! Error classification (timeouts, connection failures, TLS, HTTP status)
//! and the fixed-backoff retry decision live here, kept apart from the
//! transport so the policy is a pure function and the sleep is injectable.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::AttemptError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Backoff, RetryError, ThreadSleep};
