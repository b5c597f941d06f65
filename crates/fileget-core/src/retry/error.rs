//! Per-attempt error type for retry classification.

use std::fmt;

/// Error produced by a single HTTP attempt.
/// Classified by the retry policy before being surfaced as a `DownloadError`.
#[derive(Debug)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, TLS, setup).
    Curl(curl::Error),
    /// The response carried an error status (4xx/5xx).
    Http(u32),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Curl(e) => write!(f, "{}", e),
            AttemptError::Http(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Curl(e) => Some(e),
            AttemptError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for AttemptError {
    fn from(e: curl::Error) -> Self {
        AttemptError::Curl(e)
    }
}
