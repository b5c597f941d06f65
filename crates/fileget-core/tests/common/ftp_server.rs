//! Minimal single-session FTP server for transport integration tests.
//!
//! Speaks just enough RFC 959 for one passive binary retrieval: greeting,
//! USER/PASS, TYPE, PASV, RETR, QUIT. Every control command is recorded so
//! tests can assert on the exact command sequence.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Handle to a running single-session server.
pub struct FtpServerHandle {
    /// `host:port` of the control listener.
    pub host: String,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FtpServerHandle {
    /// Control commands received so far, verbatim.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `files`
/// (RETR argument → content). Accepts a single control session.
pub fn start(files: HashMap<String, Vec<u8>>) -> FtpServerHandle {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let commands = Arc::new(Mutex::new(Vec::new()));

    let handle = FtpServerHandle {
        host: format!("127.0.0.1:{port}"),
        commands: Arc::clone(&commands),
    };

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            session(stream, &files, &commands);
        }
    });

    handle
}

fn session(mut control: TcpStream, files: &HashMap<String, Vec<u8>>, commands: &Mutex<Vec<String>>) {
    let _ = control.write_all(b"220 test server ready\r\n");
    let mut reader = BufReader::new(control.try_clone().expect("clone control"));
    let mut data_listener: Option<TcpListener> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end().to_string();
        commands.lock().unwrap().push(line.clone());
        let (cmd, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        match cmd.to_ascii_uppercase().as_str() {
            "USER" => {
                let _ = control.write_all(b"331 password required\r\n");
            }
            "PASS" => {
                let _ = control.write_all(b"230 logged in\r\n");
            }
            "TYPE" => {
                let _ = control.write_all(b"200 switching to binary mode\r\n");
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").expect("bind data");
                let port = listener.local_addr().unwrap().port();
                let reply = format!(
                    "227 Entering Passive Mode (127,0,0,1,{},{}).\r\n",
                    port >> 8,
                    port & 0xff
                );
                data_listener = Some(listener);
                let _ = control.write_all(reply.as_bytes());
            }
            "RETR" => match (files.get(arg), data_listener.take()) {
                (Some(content), Some(listener)) => {
                    let _ = control.write_all(b"150 opening data connection\r\n");
                    if let Ok((mut data, _)) = listener.accept() {
                        let _ = data.write_all(content);
                    }
                    let _ = control.write_all(b"226 transfer complete\r\n");
                }
                _ => {
                    let _ = control.write_all(b"550 file not found\r\n");
                }
            },
            "QUIT" => {
                let _ = control.write_all(b"221 goodbye\r\n");
                return;
            }
            _ => {
                let _ = control.write_all(b"502 command not implemented\r\n");
            }
        }
    }
}
