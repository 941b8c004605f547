//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use aurora_relay::config::RelayConfig;
use aurora_relay::http::RelayServer;
use aurora_relay::lifecycle::Shutdown;

/// Start a mock upstream serving `router` on an ephemeral local port.
pub async fn start_mock_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

/// Relay config safe for tests: loopback bind, no proxy, short deadlines.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.system_proxy = false;
    config.timeouts.upstream_secs = 5;
    config.timeouts.connect_secs = 2;
    config
}

/// Point the prediction command at an inline shell script. The script sees
/// latitude and longitude as `$1` and `$2`.
pub fn with_script(mut config: RelayConfig, script: &str) -> RelayConfig {
    config.prediction.command = vec!["sh".into(), "-c".into(), script.into(), "sh".into()];
    config
}

/// Start a relay on an ephemeral port. Keep the `Shutdown` alive for the
/// duration of the test.
pub async fn spawn_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(15))
        .build()
        .unwrap()
}

/// Write a file into `dir`, creating it if needed.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}
