//! FTP control-connection client: login, passive mode, binary retrieval.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::Path;

use super::reply::{self, Reply};
use crate::error::DownloadError;

/// Standard FTP control port, used when the host carries no explicit port.
pub const FTP_PORT: u16 = 21;

/// A logged-in-or-not FTP control connection. No timeouts are set; the OS
/// socket defaults apply.
pub struct FtpClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl FtpClient {
    /// Connects to `host` (optionally `host:port`) and consumes the greeting.
    pub fn connect(host: &str) -> Result<Self, DownloadError> {
        let (name, port) = split_host_port(host)?;
        let stream = TcpStream::connect((name, port))
            .map_err(|e| DownloadError::Network(format!("connect to {host}: {e}")))?;
        let reader = BufReader::new(
            stream
                .try_clone()
                .map_err(|e| DownloadError::Network(format!("socket clone: {e}")))?,
        );
        let mut client = Self { stream, reader };
        let greeting = client.read_reply()?;
        if !greeting.is_completion() {
            return Err(greeting.into_protocol_error());
        }
        Ok(client)
    }

    /// Sends USER/PASS. A 230 straight after USER skips the PASS step.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), DownloadError> {
        let user_reply = self.command(&format!("USER {username}"))?;
        if user_reply.is_completion() {
            return Ok(());
        }
        if !user_reply.is_intermediate() {
            return Err(user_reply.into_protocol_error());
        }
        let pass_reply = self.command_redacted(&format!("PASS {password}"), "PASS ***")?;
        if !pass_reply.is_completion() {
            return Err(pass_reply.into_protocol_error());
        }
        Ok(())
    }

    /// Retrieves `remote` in binary mode over a passive data connection,
    /// streaming the bytes into `dest`. The file is created only after the
    /// server acknowledges the RETR.
    pub fn retr_to(&mut self, remote: &str, dest: &Path) -> Result<(), DownloadError> {
        let type_reply = self.command("TYPE I")?;
        if !type_reply.is_completion() {
            return Err(type_reply.into_protocol_error());
        }

        let (data_host, data_port) = self.passive()?;
        let mut data = TcpStream::connect((data_host.as_str(), data_port)).map_err(|e| {
            DownloadError::Network(format!("data connection to {data_host}:{data_port}: {e}"))
        })?;

        let retr_reply = self.command(&format!("RETR {remote}"))?;
        if !retr_reply.is_preliminary() {
            return Err(retr_reply.into_protocol_error());
        }

        let mut file = File::create(dest).map_err(|source| DownloadError::Filesystem {
            path: dest.to_path_buf(),
            source,
        })?;
        let mut buf = [0u8; 32 * 1024];
        loop {
            let n = data
                .read(&mut buf)
                .map_err(|e| DownloadError::Network(format!("data read: {e}")))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .map_err(|source| DownloadError::Filesystem {
                    path: dest.to_path_buf(),
                    source,
                })?;
        }
        drop(data);

        let done = self.read_reply()?;
        if !done.is_completion() {
            return Err(done.into_protocol_error());
        }
        Ok(())
    }

    /// Best-effort QUIT; the control connection drops either way.
    pub fn quit(mut self) {
        if self.stream.write_all(b"QUIT\r\n").is_ok() {
            let _ = self.read_reply();
        }
    }

    fn passive(&mut self) -> Result<(String, u16), DownloadError> {
        let pasv_reply = self.command("PASV")?;
        if pasv_reply.code != 227 {
            return Err(pasv_reply.into_protocol_error());
        }
        reply::parse_pasv_addr(&pasv_reply.text).ok_or_else(|| {
            DownloadError::Network(format!("unparseable PASV reply: {}", pasv_reply.text))
        })
    }

    fn command(&mut self, cmd: &str) -> Result<Reply, DownloadError> {
        self.command_redacted(cmd, cmd)
    }

    fn command_redacted(&mut self, cmd: &str, log_as: &str) -> Result<Reply, DownloadError> {
        tracing::debug!(command = log_as, "ftp send");
        self.stream
            .write_all(format!("{cmd}\r\n").as_bytes())
            .map_err(|e| DownloadError::Network(format!("control write: {e}")))?;
        self.read_reply()
    }

    fn read_reply(&mut self) -> Result<Reply, DownloadError> {
        let first = self.read_line()?;
        let (code, more, text) = reply::parse_first_line(&first)?;
        let mut full = text.to_string();
        if more {
            loop {
                let line = self.read_line()?;
                if let Some(last) = reply::multiline_end(code, &line) {
                    if !last.is_empty() {
                        full.push(' ');
                        full.push_str(last);
                    }
                    break;
                }
            }
        }
        tracing::debug!(code, text = %full, "ftp reply");
        Ok(Reply { code, text: full })
    }

    fn read_line(&mut self) -> Result<String, DownloadError> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| DownloadError::Network(format!("control read: {e}")))?;
        if n == 0 {
            return Err(DownloadError::Network(
                "control connection closed by server".to_string(),
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Splits an optional `:port` suffix off the host; bare hosts use port 21.
fn split_host_port(host: &str) -> Result<(&str, u16), DownloadError> {
    match host.rsplit_once(':') {
        Some((name, port_str))
            if !port_str.is_empty() && port_str.bytes().all(|b| b.is_ascii_digit()) =>
        {
            let port = port_str
                .parse()
                .map_err(|_| DownloadError::Malformed(format!("invalid FTP port in {host:?}")))?;
            Ok((name, port))
        }
        _ => Ok((host, FTP_PORT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        assert_eq!(split_host_port("ftp.example.com").unwrap(), ("ftp.example.com", 21));
    }

    #[test]
    fn explicit_port_is_honored() {
        assert_eq!(split_host_port("127.0.0.1:2121").unwrap(), ("127.0.0.1", 2121));
    }

    #[test]
    fn oversized_port_is_malformed() {
        assert!(matches!(
            split_host_port("h:70000"),
            Err(DownloadError::Malformed(_))
        ));
    }
}
