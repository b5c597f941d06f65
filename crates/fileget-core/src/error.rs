//! Public error surface of the transfer engine.

use std::path::PathBuf;

/// Failure modes a transfer can end in.
///
/// The HTTP transport retries `Network`/`HttpStatus`/`Tls` failures per
/// attempt (surfacing `Exhausted` once the attempt budget is spent); every
/// other kind propagates immediately. The FTP transport never retries.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Input that cannot be interpreted: FTP URL without a path separator,
    /// header entry without a colon, form field without `=`.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// FTP login needs credentials but none were given and anonymous mode is off.
    #[error("FTP login requires --username and --password (or --ftp-anonymous)")]
    AuthRequired,

    /// Connection-level failure: refused, DNS, timeout, broken transfer.
    #[error("network error: {0}")]
    Network(String),

    /// Terminal HTTP error status.
    #[error("HTTP {0}")]
    HttpStatus(u32),

    /// TLS handshake or certificate verification failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// FTP server answered a command with an error reply.
    #[error("FTP error {code}: {message}")]
    FtpProtocol { code: u32, message: String },

    /// Destination file could not be created or written.
    #[error("cannot write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// All HTTP attempts failed.
    #[error("failed to download {url} after {attempts} attempt(s)")]
    Exhausted {
        url: String,
        attempts: u32,
        /// The last attempt's failure, when at least one attempt ran.
        #[source]
        last: Option<Box<DownloadError>>,
    },
}
