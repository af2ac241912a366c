//! Chain Relay: multi-hop transaction chain node
//!
//! A single configurable service node for a simulated multi-hop distributed
//! transaction. Nodes forward a request along a fixed chain; each hop
//! persists a local record, then decides whether to relay to the next hop or
//! terminate the chain.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────┐
//!                  │                    CHAIN NODE                     │
//!                  │                                                   │
//!   POST /create   │  ┌─────────┐    ┌───────────┐    ┌────────────┐   │
//!   ───────────────┼─▶│  http   │───▶│   chain   │───▶│   store    │───┼──▶ Store
//!                  │  │ server  │    │   node    │    │   client   │   │    Service
//!                  │  └─────────┘    └─────┬─────┘    └────────────┘   │
//!                  │                       │                           │
//!                  │                       ▼                           │
//!                  │               ┌───────────────┐                   │
//!                  │               │  resilience   │                   │
//!                  │               │ fault+breaker │                   │
//!                  │               └───────┬───────┘                   │
//!                  │                       │                           │
//!   Response       │  ┌─────────┐    ┌─────▼─────┐                     │
//!   ◀──────────────┼──│envelope │◀───│ next hop  │─────────────────────┼──▶ Next
//!                  │  │formatter│    │  client   │                     │    Node
//!                  │  └─────────┘    └───────────┘                     │
//!                  │                                                   │
//!                  │  ┌─────────────────────────────────────────────┐  │
//!                  │  │  config  │  observability  │  lifecycle     │  │
//!                  │  └─────────────────────────────────────────────┘  │
//!                  └───────────────────────────────────────────────────┘
//! ```
//!
//! Per-request control flow: persist → fault-injection check → hop-limit
//! check → forward through the circuit breaker → wrap in the response
//! envelope. Breaker failures are absorbed into a success response carrying
//! an error envelope; injected faults and persistence failures surface as
//! hard HTTP errors.

// Core subsystems
pub mod chain;
pub mod config;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::NodeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
