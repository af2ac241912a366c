//! Breaker behavior over the full HTTP surface: slow downstream calls are
//! degraded with a timeout error, repeated failures trip the breaker, and
//! an open breaker fast-fails without touching the network.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chain_relay::config::NodeConfig;
use chain_relay::{HttpServer, Shutdown};
use serde_json::{json, Value};

mod common;

fn node_config(bind: SocketAddr, store: SocketAddr, next_hop: SocketAddr) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.identity = "order".to_string();
    config.listener.bind_address = bind.to_string();
    config.store.url = format!("http://{}/entities", store);
    config.chain.next_hop_endpoint = format!("http://{}/create", next_hop);
    // Fast-tripping breaker for test stability.
    config.breaker.call_timeout_ms = 100;
    config.breaker.min_volume = 2;
    config.breaker.error_threshold_pct = 50;
    config.breaker.reset_timeout_ms = 60_000;
    config
}

async fn spawn_node(config: NodeConfig) -> Shutdown {
    let bind: SocketAddr = config.listener.bind_address.parse().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let listener = tokio::net::TcpListener::bind(bind).await.unwrap();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_slow_downstream_degrades_with_timeout_error() {
    let store_addr: SocketAddr = "127.0.0.1:36201".parse().unwrap();
    let next_addr: SocketAddr = "127.0.0.1:36202".parse().unwrap();
    let node_addr: SocketAddr = "127.0.0.1:36203".parse().unwrap();

    common::start_mock_store(store_addr).await;
    common::start_programmable_backend(next_addr, |_| async {
        // Slower than the 100ms execution timeout.
        tokio::time::sleep(Duration::from_millis(300)).await;
        (200, "{}".to_string())
    })
    .await;

    let shutdown = spawn_node(node_config(node_addr, store_addr, next_addr)).await;

    let res = client()
        .post(format!("http://{}/create?count=0", node_addr))
        .json(&json!({"amount": 12}))
        .send()
        .await
        .expect("node unreachable");

    // Degraded, not failed: success status, error envelope.
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["service"], "order");
    assert!(
        body["error"].as_str().unwrap().contains("timed out"),
        "envelope must describe the timeout, got: {}",
        body["error"]
    );
    assert!(body.get("data").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_open_breaker_fast_fails_without_network_calls() {
    let store_addr: SocketAddr = "127.0.0.1:36204".parse().unwrap();
    let next_addr: SocketAddr = "127.0.0.1:36205".parse().unwrap();
    let node_addr: SocketAddr = "127.0.0.1:36206".parse().unwrap();

    common::start_mock_store(store_addr).await;

    let downstream_calls = Arc::new(AtomicU32::new(0));
    let dc = downstream_calls.clone();
    common::start_programmable_backend(next_addr, move |_| {
        let dc = dc.clone();
        async move {
            dc.fetch_add(1, Ordering::SeqCst);
            (503, r#"{"error":"down"}"#.to_string())
        }
    })
    .await;

    let shutdown = spawn_node(node_config(node_addr, store_addr, next_addr)).await;
    let client = client();

    // Two failing calls reach min_volume at a 100% failure ratio.
    for _ in 0..2 {
        let res = client
            .post(format!("http://{}/create?count=0", node_addr))
            .json(&json!({"amount": 12}))
            .send()
            .await
            .expect("node unreachable");
        assert_eq!(res.status(), 200, "breaker failures must stay status-success");
        let body: Value = res.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("503"));
    }
    assert_eq!(downstream_calls.load(Ordering::SeqCst), 2);

    // Breaker is now open: immediate rejection, no network attempt.
    let res = client
        .post(format!("http://{}/create?count=0", node_addr))
        .json(&json!({"amount": 12}))
        .send()
        .await
        .expect("node unreachable");

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert!(
        body["error"].as_str().unwrap().contains("circuit open"),
        "envelope must carry the rejection, got: {}",
        body["error"]
    );
    assert_eq!(
        downstream_calls.load(Ordering::SeqCst),
        2,
        "an open breaker must not contact the destination"
    );

    shutdown.trigger();
}
