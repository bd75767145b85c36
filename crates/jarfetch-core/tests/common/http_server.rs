//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes by exact path. Unknown paths get 404. Counts
//! every request so tests can assert that no network access happened.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with the given body and an accurate Content-Length.
    Body(Vec<u8>),
    /// 302 to the given location (absolute or path-relative).
    Redirect(String),
    /// Bare status with an empty body.
    Status(u16),
    /// Advertises `advertised` bytes, sends `body`, then closes the connection.
    Truncated { body: Vec<u8>, advertised: usize },
}

pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345" (no trailing slash).
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Reply)>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Reply>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect(),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&hits_srv);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Reply>, hits: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    hits.fetch_add(1, Ordering::SeqCst);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");

    match routes.get(path) {
        Some(Reply::Body(body)) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/java-archive\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Some(Reply::Redirect(location)) => {
            let head = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Some(Reply::Status(code)) => write_status(&mut stream, *code),
        Some(Reply::Truncated { body, advertised }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                advertised
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        None => write_status(&mut stream, 404),
    }
}

fn write_status(stream: &mut TcpStream, code: u16) {
    let response = format!(
        "HTTP/1.1 {} Status\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        code
    );
    let _ = stream.write_all(response.as_bytes());
}
