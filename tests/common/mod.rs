//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use devserve::config::{ListenerConfig, ServerConfig};
use devserve::http::HttpServer;
use devserve::routing::ProxyTable;

/// Start a mock upstream that answers every connection with a fixed raw
/// HTTP response. Returns its address and a channel carrying the first
/// request line of every request it received.
#[allow(dead_code)]
pub async fn start_recording_upstream(
    raw_response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]).to_string();
                        let first_line = request.lines().next().unwrap_or("").to_string();
                        let _ = tx.send(first_line);
                        let _ = socket.write_all(raw_response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start an upstream that accepts connections but never responds.
#[allow(dead_code)]
pub async fn start_black_hole_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Create a unique per-test static directory under the system temp dir.
pub fn temp_static_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("devserve-test-{}-{}", tag, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Build a test configuration serving `static_dir` with the given table.
pub fn test_config(static_dir: PathBuf, proxy: ProxyTable) -> ServerConfig {
    ServerConfig {
        listener: ListenerConfig::default(),
        static_dir,
        proxy,
        upstream_timeout: None,
        cgi: false,
        open_browser: false,
    }
}

/// Start a devserve server on an ephemeral loopback port.
pub async fn start_server(config: ServerConfig) -> SocketAddr {
    let listener = devserve::net::bind(Some("127.0.0.1"), 0).unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(Arc::new(config)).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Give the accept loop a moment to come up.
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
