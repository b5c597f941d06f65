//! The resolved parameter set one transfer consumes.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// HTTP request method. `Post` is only meaningful for the HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Username/password pair. The HTTP transport uses it as basic auth; the
/// FTP transport uses it as login (unless anonymous mode is on).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Fully-resolved parameters for a single transfer.
///
/// Built once by the CLI from flags and config-file defaults, consumed once
/// by exactly one transport, then discarded. Not mutated after construction
/// except for [`TransferRequest::apply_force_https`], which the dispatcher
/// applies before routing.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub url: String,
    /// Destination file; its parent directory must already exist.
    pub dest_path: PathBuf,
    pub method: HttpMethod,
    /// POST form fields (HTTP only).
    pub body_fields: HashMap<String, String>,
    /// Extra request headers; keys unique, last write wins.
    pub headers: HashMap<String, String>,
    pub credentials: Option<Credentials>,
    /// FTP only; when true, `credentials` are ignored.
    pub ftp_anonymous: bool,
    /// Proxy URL for both http and https traffic (HTTP only).
    pub proxy: Option<String>,
    /// Total request timeout in seconds (HTTP only).
    pub timeout_secs: u64,
    /// Exact number of attempts; 0 means no attempt is made (HTTP only).
    pub max_retries: u32,
    pub force_https: bool,
    /// Inverse of `--no-check-certificate`.
    pub verify_tls: bool,
    /// Client certificate file (HTTP only).
    pub client_cert: Option<PathBuf>,
}

impl TransferRequest {
    /// A GET request with default options; callers fill in the rest.
    pub fn new(url: impl Into<String>, dest_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest_path: dest_path.into(),
            method: HttpMethod::Get,
            body_fields: HashMap::new(),
            headers: HashMap::new(),
            credentials: None,
            ftp_anonymous: false,
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            force_https: false,
            verify_tls: true,
            client_cert: None,
        }
    }

    /// Rewrites a leading `http://` to `https://` when `force_https` is set.
    ///
    /// The one documented mutation of a request; applied by the dispatcher
    /// before routing, so it happens before any network call. An already
    /// secure URL (or a non-HTTP one) is left untouched.
    pub fn apply_force_https(&mut self) {
        if self.force_https && self.url.starts_with("http://") {
            self.url = self.url.replacen("http://", "https://", 1);
        }
    }
}
