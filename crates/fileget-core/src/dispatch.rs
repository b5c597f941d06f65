//! Scheme-based routing to the HTTP or FTP transport.

use crate::error::DownloadError;
use crate::request::TransferRequest;
use crate::{ftp, http};

/// Routes a request to the transport its URL scheme selects and runs it.
///
/// `ftp://` URLs go to the FTP transport with the host and remote path
/// split out; every other URL goes to the HTTP transport whole. The
/// force-https rewrite is applied here, before any transport sees the
/// request. No filesystem or network access happens in this function
/// itself.
pub fn dispatch(mut request: TransferRequest) -> Result<(), DownloadError> {
    request.apply_force_https();
    match request.url.strip_prefix("ftp://") {
        Some(rest) => {
            let (host, remote_path) = split_ftp_url(rest)?;
            tracing::debug!(host, remote_path, "dispatching to ftp");
            ftp::fetch(
                host,
                remote_path,
                &request.dest_path,
                request.credentials.as_ref(),
                request.ftp_anonymous,
            )
        }
        None => {
            tracing::debug!(url = %request.url, "dispatching to http");
            http::fetch(&request)
        }
    }
}

/// Splits the part after `ftp://` into `(host, remote_path)` on the first
/// slash. A URL without any path separator is malformed.
fn split_ftp_url(rest: &str) -> Result<(&str, &str), DownloadError> {
    rest.split_once('/').ok_or_else(|| {
        DownloadError::Malformed(format!("FTP URL has no path: ftp://{rest}"))
    })
}
