//! FTP reply-line parsing: status codes, multiline markers, PASV addresses.

use crate::error::DownloadError;

/// A complete server reply: three-digit code plus text.
#[derive(Debug, Clone)]
pub struct Reply {
    pub code: u32,
    pub text: String,
}

impl Reply {
    /// 1xx: the server is about to open the data connection.
    pub fn is_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }

    /// 2xx: the command completed.
    pub fn is_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// 3xx: the server wants a follow-up command (e.g. PASS after USER).
    pub fn is_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    /// Turns an unexpected reply into the public protocol error.
    pub fn into_protocol_error(self) -> DownloadError {
        DownloadError::FtpProtocol {
            code: self.code,
            message: self.text,
        }
    }
}

/// Parses the first line of a reply into `(code, more_lines, text)`.
///
/// `more_lines` is true for the `NNN-` multiline form; the reply then runs
/// until a line starting with `NNN ` (same code, space separator).
pub fn parse_first_line(line: &str) -> Result<(u32, bool, &str), DownloadError> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(|b| b.is_ascii_digit()) {
        return Err(DownloadError::Network(format!(
            "malformed FTP reply: {line:?}"
        )));
    }
    let code = bytes[..3]
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
    match bytes.get(3) {
        Some(b'-') => Ok((code, true, line[4..].trim())),
        Some(b' ') => Ok((code, false, line[4..].trim())),
        None => Ok((code, false, "")),
        Some(_) => Err(DownloadError::Network(format!(
            "malformed FTP reply: {line:?}"
        ))),
    }
}

/// True if `line` terminates a multiline reply opened with `code`.
/// Returns the final line's text.
pub fn multiline_end(code: u32, line: &str) -> Option<&str> {
    let prefix = format!("{code:03} ");
    line.strip_prefix(&prefix).map(str::trim)
}

/// Extracts `(host, port)` from a 227 PASV reply text such as
/// `Entering Passive Mode (127,0,0,1,195,80).`
///
/// Servers vary in punctuation, so this accepts the six numbers with or
/// without surrounding parentheses.
pub fn parse_pasv_addr(text: &str) -> Option<(String, u16)> {
    let inner = text
        .find('(')
        .and_then(|start| {
            let rest = &text[start + 1..];
            rest.find(')').map(|end| &rest[..end])
        })
        .map(str::to_string);

    let candidates: Vec<String> = match inner {
        Some(group) => vec![group],
        None => text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_ascii_digit()).to_string())
            .collect(),
    };

    for candidate in candidates {
        let nums: Vec<u32> = candidate
            .split(',')
            .map(|s| s.trim().parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();
        if nums.len() == 6 && nums.iter().all(|&n| n <= 255) {
            let host = format!("{}.{}.{}.{}", nums[0], nums[1], nums[2], nums[3]);
            let port = (nums[4] as u16) << 8 | nums[5] as u16;
            return Some((host, port));
        }
    }
    None
}
