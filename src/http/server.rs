//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the chain routes
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Map chain outcomes to HTTP statuses
//!
//! Status mapping is part of the product contract: only injected faults
//! (502) and persistence failures (500) produce non-success statuses; every
//! breaker-related outcome is downgraded to 200 with an error envelope so
//! the chain continues from the caller's viewpoint even when degraded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::chain::{hop, ChainError, ChainNode};
use crate::config::NodeConfig;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub node: Arc<ChainNode>,
}

/// HTTP server for one chain node.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server with production wiring.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_node(&config, Arc::new(ChainNode::new(&config)))
    }

    /// Create a server around an externally-built node (used by tests to
    /// inject deterministic collaborators).
    pub fn with_node(config: &NodeConfig, node: Arc<ChainNode>) -> Self {
        let state = AppState { node };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &NodeConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(greeting))
            .route("/create", post(create))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness/identity probe.
async fn greeting(State(state): State<AppState>) -> String {
    format!("hello from {}\n", state.node.identity())
}

/// Chain entry point: persist, then relay or terminate.
async fn create(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    Json(payload): Json<Value>,
) -> Response {
    let start = Instant::now();
    let hop_count = hop::parse_count(params.get("count").map(String::as_str));

    let (status, envelope) = match state.node.handle(payload, hop_count).await {
        Ok(envelope) => (StatusCode::OK, envelope),
        Err(ChainError::FaultInjected) => (
            StatusCode::BAD_GATEWAY,
            state.node.formatter().unavailable(),
        ),
        Err(ChainError::Persistence(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            state.node.formatter().error(e),
        ),
    };

    metrics::record_request("/create", status.as_u16(), start);
    (status, Json(envelope)).into_response()
}
