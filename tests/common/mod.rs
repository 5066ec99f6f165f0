//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use static_proxy::config::{RouteSpecs, ServerConfig};
use static_proxy::error::ServerError;
use static_proxy::{HttpServer, Lifecycle, RouteTable, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh, not yet existing directory under the system temp dir.
pub fn unique_dir(name: &str) -> PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "static-proxy-it-{}-{}-{}",
        std::process::id(),
        n,
        name
    ))
}

pub fn specs(types: &[&str], paths: &[&str], targets: &[&str], headers: &[&str]) -> RouteSpecs {
    let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
    RouteSpecs {
        types: owned(types),
        paths: owned(paths),
        targets: owned(targets),
        headers: owned(headers),
    }
}

/// A running edge server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Arc<Shutdown>,
    pub lifecycle: Lifecycle,
    pub task: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(routes: RouteSpecs, drain: Duration) -> TestServer {
    let config = ServerConfig {
        routes,
        ..ServerConfig::default()
    };
    start_server_with_config(config, drain).await
}

/// Start a server from a full configuration; the listener address in
/// `config` is ignored in favour of an ephemeral port.
pub async fn start_server_with_config(config: ServerConfig, drain: Duration) -> TestServer {
    let table = RouteTable::build(&config.routes).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new(drain));
    let lifecycle = Lifecycle::new();

    let server = HttpServer::new(config, table);
    let handle = shutdown.handle();
    let task_lifecycle = lifecycle.clone();
    let task = tokio::spawn(async move { server.run(listener, handle, task_lifecycle).await });

    TestServer {
        addr,
        shutdown,
        lifecycle,
        task,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Send `raw` over a fresh connection and return everything read back.
pub async fn raw_request(addr: SocketAddr, raw: &[u8]) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(raw).await.unwrap();
    let mut buf = Vec::new();
    let _ = socket.read_to_end(&mut buf).await;
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a backend that answers every request with its own request head
/// as the body, after an optional delay.
pub async fn start_echo_backend(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Backend: echo\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    head.len(),
                    head
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that always answers with `status` and `body`.
pub async fn start_status_backend(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
