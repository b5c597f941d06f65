//! FTP transport: single-attempt binary RETR over a control connection and
//! a passive data connection.
//!
//! Unlike the HTTP transport there is no retry: every failure (connection
//! refused, login rejected, missing file, write error) ends the operation
//! after one attempt.

mod client;
mod reply;

pub use client::{FtpClient, FTP_PORT};

use std::path::Path;

use crate::error::DownloadError;
use crate::request::Credentials;

/// Retrieves `remote_path` from `host` into `dest_path`.
///
/// `anonymous` logs in as `anonymous`/`anonymous@` and ignores
/// `credentials` entirely; otherwise both username and password are
/// required. The control connection is closed on every exit path.
pub fn fetch(
    host: &str,
    remote_path: &str,
    dest_path: &Path,
    credentials: Option<&Credentials>,
    anonymous: bool,
) -> Result<(), DownloadError> {
    tracing::debug!(host, remote_path, anonymous, "ftp transfer start");
    let mut session = FtpClient::connect(host)?;
    let result = transfer(&mut session, remote_path, dest_path, credentials, anonymous);
    session.quit();
    result?;
    println!("Downloaded: {}", dest_path.display());
    tracing::info!(host, remote_path, "ftp download complete");
    Ok(())
}

fn transfer(
    session: &mut FtpClient,
    remote_path: &str,
    dest_path: &Path,
    credentials: Option<&Credentials>,
    anonymous: bool,
) -> Result<(), DownloadError> {
    if anonymous {
        session.login("anonymous", "anonymous@")?;
    } else {
        let creds = credentials.ok_or(DownloadError::AuthRequired)?;
        session.login(&creds.username, &creds.password)?;
    }
    // The leading slash is prepended unconditionally, even when the path
    // already starts with one (ftp://host//a yields "RETR //a").
    session.retr_to(&format!("/{remote_path}"), dest_path)
}
