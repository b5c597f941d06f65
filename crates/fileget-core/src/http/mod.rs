//! HTTP(S) transport: GET/POST via libcurl with auth, proxy, TLS controls,
//! and bounded fixed-backoff retry.
//!
//! The response body is buffered in memory and written to the destination
//! only once a complete, successful response is in hand, so a failed
//! attempt never leaves a partial file on disk.

use std::collections::HashMap;
use std::time::Duration;

use curl::easy::{Auth, Easy, List};

use crate::error::DownloadError;
use crate::request::{HttpMethod, TransferRequest};
use crate::retry::{
    classify, run_with_retry, AttemptError, Backoff, ErrorKind, RetryError, RetryPolicy,
    ThreadSleep,
};

/// Fixed wait between failed attempts.
pub const ATTEMPT_BACKOFF: Duration = Duration::from_secs(2);

/// Bound on redirect chains per attempt.
const MAX_REDIRECTS: u32 = 10;

/// Downloads `request.url` to `request.dest_path`, retrying transient
/// failures up to `request.max_retries` attempts with the fixed backoff.
pub fn fetch(request: &TransferRequest) -> Result<(), DownloadError> {
    let policy = RetryPolicy {
        max_attempts: request.max_retries,
        backoff: ATTEMPT_BACKOFF,
    };
    fetch_with(request, &policy, &ThreadSleep)
}

/// Like [`fetch`], with the retry policy and backoff supplied by the caller
/// so tests run without real delays.
pub fn fetch_with(
    request: &TransferRequest,
    policy: &RetryPolicy,
    backoff: &dyn Backoff,
) -> Result<(), DownloadError> {
    let outcome = run_with_retry(
        policy,
        backoff,
        |attempt, err| {
            println!(
                "Attempt {}/{} failed: {}",
                attempt, policy.max_attempts, err
            );
            tracing::warn!(attempt, max_attempts = policy.max_attempts, error = %err, "attempt failed");
        },
        |_| perform_once(request),
    );

    match outcome {
        Ok(body) => {
            std::fs::write(&request.dest_path, &body).map_err(|source| {
                DownloadError::Filesystem {
                    path: request.dest_path.clone(),
                    source,
                }
            })?;
            println!("Downloaded: {}", request.dest_path.display());
            tracing::info!(url = %request.url, bytes = body.len(), "download complete");
            Ok(())
        }
        Err(RetryError::Fatal(e)) => Err(surface_error(e)),
        Err(RetryError::Exhausted { attempts, last }) => {
            println!(
                "Failed to download {} after {} attempts.",
                request.url, attempts
            );
            tracing::warn!(url = %request.url, attempts, "retries exhausted");
            Err(DownloadError::Exhausted {
                url: request.url.clone(),
                attempts,
                last: last.map(|e| Box::new(surface_error(e))),
            })
        }
    }
}

/// One request/response cycle on a fresh handle.
fn perform_once(request: &TransferRequest) -> Result<Vec<u8>, AttemptError> {
    let mut easy = Easy::new();
    easy.url(&request.url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.timeout(Duration::from_secs(request.timeout_secs))?;

    if let Some(proxy) = &request.proxy {
        // libcurl applies the proxy to both http and https traffic.
        easy.proxy(proxy)?;
    }

    if let Some(creds) = &request.credentials {
        let mut auth = Auth::new();
        auth.basic(true);
        easy.http_auth(&auth)?;
        easy.username(&creds.username)?;
        easy.password(&creds.password)?;
    }

    if !request.verify_tls {
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;
    }
    if let Some(cert) = &request.client_cert {
        easy.ssl_cert(cert)?;
    }

    if request.method == HttpMethod::Post {
        let payload = form_encode(&mut easy, &request.body_fields);
        easy.post(true)?;
        easy.post_fields_copy(payload.as_bytes())?;
    }

    if !request.headers.is_empty() {
        let mut list = List::new();
        for (name, value) in &request.headers {
            list.append(&format!("{}: {}", name.trim(), value.trim()))?;
        }
        easy.http_headers(list)?;
    }

    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code >= 400 {
        return Err(AttemptError::Http(code));
    }
    Ok(body)
}

/// Percent-encodes form fields into an `application/x-www-form-urlencoded` body.
fn form_encode(easy: &mut Easy, fields: &HashMap<String, String>) -> String {
    let mut parts = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        parts.push(format!(
            "{}={}",
            easy.url_encode(key.as_bytes()),
            easy.url_encode(value.as_bytes())
        ));
    }
    parts.join("&")
}

/// Maps an attempt error to the public error surface by its class.
fn surface_error(e: AttemptError) -> DownloadError {
    match classify(&e) {
        ErrorKind::Tls => DownloadError::Tls(e.to_string()),
        ErrorKind::HttpStatus(code) => DownloadError::HttpStatus(code as u32),
        _ => DownloadError::Network(e.to_string()),
    }
}
