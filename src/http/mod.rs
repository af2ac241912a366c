//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! inbound connection
//!     → server.rs (Axum setup, middleware, routes)
//!     → chain::node (per-hop orchestration)
//!     → server.rs (status mapping: 200 / 502 / 500)
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
