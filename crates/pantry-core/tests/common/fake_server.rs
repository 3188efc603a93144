//! Minimal stand-ins for a PostgreSQL server used by the acquisition tests.
//!
//! Nothing here speaks the full protocol: a server either rejects every
//! startup message with an `ErrorResponse` carrying a chosen SQLSTATE,
//! accepts TCP connections and never answers, or completes the handshake
//! and hangs up on the first query.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A listening fake server and the number of connections it has accepted.
pub struct FakeServer {
    pub port: u16,
    accepted: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl FakeServer {
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Connections the client hung up on after the server stopped talking.
    pub fn closed_by_client(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Descriptor pointing at this server with TLS negotiation disabled.
    pub fn descriptor(&self) -> String {
        format!(
            "Host=127.0.0.1;Port={};Database=pantry;Username=app;Password=pw;SslMode=disable",
            self.port
        )
    }
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Answer every startup message with a FATAL error carrying `sqlstate`.
pub fn start_rejecting(sqlstate: &'static str, message: &'static str) -> FakeServer {
    start(move |mut stream, _| {
        if read_startup(&mut stream).is_ok() {
            let _ = stream.write_all(&error_response(sqlstate, message));
            let _ = stream.flush();
        }
    })
}

/// Accept connections and hold them open without ever replying.
pub fn start_silent() -> FakeServer {
    start(|stream, _| {
        thread::sleep(Duration::from_secs(10));
        drop(stream);
    })
}

/// Finish the startup handshake, then stop writing as soon as the first
/// message after it (the validation query) arrives. The client sees EOF.
pub fn start_dropping_after_handshake() -> FakeServer {
    start(|mut stream, closed| {
        if read_startup(&mut stream).is_err() {
            return;
        }
        let _ = stream.write_all(&handshake_ok());
        let _ = stream.flush();
        if read_message(&mut stream).is_err() {
            return;
        }
        let _ = stream.shutdown(Shutdown::Write);
        let mut buf = [0u8; 64];
        loop {
            match stream.read(&mut buf) {
                Ok(0) => {
                    closed.fetch_add(1, Ordering::SeqCst);
                    return;
                }
                Ok(_) => continue,
                Err(_) => return,
            }
        }
    })
}

fn start<F>(handler: F) -> FakeServer
where
    F: Fn(TcpStream, &AtomicUsize) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let accepted = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    let closed_counter = Arc::clone(&closed);
    let handler = Arc::new(handler);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            let handler = Arc::clone(&handler);
            let closed_counter = Arc::clone(&closed_counter);
            thread::spawn(move || handler(stream, &closed_counter));
        }
    });
    FakeServer {
        port,
        accepted,
        closed,
    }
}

/// Read one length-prefixed startup packet.
fn read_startup(stream: &mut TcpStream) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    let mut len = [0u8; 4];
    stream.read_exact(&mut len)?;
    let len = u32::from_be_bytes(len) as usize;
    let mut rest = vec![0u8; len.saturating_sub(4)];
    stream.read_exact(&mut rest)?;
    Ok(())
}

/// Read one tagged frontend message (tag byte + length-prefixed body).
fn read_message(stream: &mut TcpStream) -> std::io::Result<u8> {
    let mut header = [0u8; 5];
    stream.read_exact(&mut header)?;
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
    let mut rest = vec![0u8; len.saturating_sub(4)];
    stream.read_exact(&mut rest)?;
    Ok(header[0])
}

fn message(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 5);
    out.push(tag);
    out.extend_from_slice(&((body.len() + 4) as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// AuthenticationOk, a server_version status, BackendKeyData and an idle ReadyForQuery.
fn handshake_ok() -> Vec<u8> {
    let mut out = message(b'R', &0u32.to_be_bytes());
    out.extend(message(b'S', b"server_version\x0016.0\x00"));
    let mut key = Vec::new();
    key.extend_from_slice(&4242u32.to_be_bytes());
    key.extend_from_slice(&7u32.to_be_bytes());
    out.extend(message(b'K', &key));
    out.extend(message(b'Z', b"I"));
    out
}

fn error_response(sqlstate: &str, message: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for (tag, value) in [(b'S', "FATAL"), (b'V', "FATAL"), (b'C', sqlstate), (b'M', message)] {
        body.push(tag);
        body.extend_from_slice(value.as_bytes());
        body.push(0);
    }
    body.push(0);
    self::message(b'E', &body)
}
