//! Minimal scripted HTTP/1.1 server for transport integration tests.
//!
//! Answers connections with a fixed sequence of statuses/bodies (the last
//! entry repeats), counts hits, and records raw requests so tests can
//! assert on methods, headers, and POST bodies as they appear on the wire.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl ScriptedResponse {
    pub fn status(status: u32) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
        }
    }
}

/// Handle to a running scripted server.
pub struct ScriptedServer {
    /// URL of the single resource the server pretends to host.
    pub url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw requests (head + body) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(script: Vec<ScriptedResponse>) -> ScriptedServer {
    assert!(!script.is_empty(), "script must have at least one response");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));

    let server = ScriptedServer {
        url: format!("http://127.0.0.1:{port}/file.bin"),
        hits: Arc::clone(&hits),
        requests: Arc::clone(&requests),
    };

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let n = hits.fetch_add(1, Ordering::SeqCst);
            let response = script.get(n).unwrap_or_else(|| script.last().unwrap());
            handle(stream, response, &requests);
        }
    });

    server
}

fn handle(mut stream: TcpStream, response: &ScriptedResponse, requests: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    let mut head_end = None;
    while head_end.is_none() {
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&tmp[..n]);
                head_end = find_subslice(&buf, b"\r\n\r\n");
            }
        }
    }
    let head_end = match head_end {
        Some(i) => i,
        None => return,
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();

    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&tmp[..n]),
        }
    }

    requests
        .lock()
        .unwrap()
        .push(format!("{head}\r\n\r\n{}", String::from_utf8_lossy(&body)));

    let reason = match response.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response_head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        reason,
        response.body.len()
    );
    let _ = stream.write_all(response_head.as_bytes());
    let _ = stream.write_all(&response.body);
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
