//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use catalog_service::config::ServiceConfig;
use catalog_service::{GatewayServer, HttpServer, Shutdown};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// A server running on an ephemeral loopback port.
pub struct Running {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

fn loopback_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.gateway.bind_address = "127.0.0.1:0".into();
    config
}

/// Start the catalog service with default settings.
pub async fn start_catalog() -> Running {
    let config = loopback_config();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    Running { addr, shutdown }
}

/// Start the gateway in front of `upstream`.
#[allow(dead_code)]
pub async fn start_gateway(upstream: SocketAddr, timeout_secs: u64) -> Running {
    let mut config = loopback_config();
    config.gateway.upstream = format!("http://{upstream}");
    config.gateway.upstream_timeout_secs = timeout_secs;

    let listener = TcpListener::bind(&config.gateway.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    Running { addr, shutdown }
}

/// Start a backend that waits `delay` before answering 200.
#[allow(dead_code)]
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let body = "[]";
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
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

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
