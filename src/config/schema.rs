//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a chain
//! node. All types derive Serde traits for deserialization from config
//! files; the loader applies environment overrides on top.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a chain node.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Service identity used in envelopes and logs (e.g. "order").
    #[serde(default = "default_identity")]
    pub identity: String,

    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Chain topology: hop limit and downstream endpoint.
    pub chain: ChainConfig,

    /// Synthetic fault injection settings.
    pub fault: FaultConfig,

    /// Circuit breaker tuning for the next-hop destination.
    pub breaker: BreakerConfig,

    /// Persistence service settings.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            listener: ListenerConfig::default(),
            chain: ChainConfig::default(),
            fault: FaultConfig::default(),
            breaker: BreakerConfig::default(),
            store: StoreConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_identity() -> String {
    "chain-node".to_string()
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Chain topology configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum chain length; a request whose incremented hop count reaches
    /// this value terminates at this node.
    pub max_hops: u32,

    /// Endpoint of the next node's create route.
    pub next_hop_endpoint: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_hops: 6,
            next_hop_endpoint: "http://127.0.0.1:3001/create".to_string(),
        }
    }
}

/// Synthetic fault injection configuration.
///
/// The injector simulates upstream unavailability unrelated to real
/// downstream health; it fires before any forwarding is attempted and never
/// touches breaker accounting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Enable the fault injector.
    pub enabled: bool,

    /// A uniform draw in [0, 1) strictly above this value triggers a fault.
    /// The default 0.6 yields roughly a 40% trigger rate.
    pub trigger_threshold: f64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_threshold: 0.6,
        }
    }
}

/// Circuit breaker tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Bounded execution time for a single protected call, in milliseconds.
    /// Exceeding it counts as a failure and the in-flight call is abandoned.
    pub call_timeout_ms: u64,

    /// Failure percentage within the rolling window at which the breaker
    /// trips (0-100).
    pub error_threshold_pct: u8,

    /// Time the breaker stays open before admitting a recovery trial, in
    /// milliseconds.
    pub reset_timeout_ms: u64,

    /// Minimum calls observed in the rolling window before the breaker is
    /// allowed to trip.
    pub min_volume: u32,

    /// Length of the rolling statistics window, in milliseconds.
    pub window_ms: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 300,
            error_threshold_pct: 50,
            reset_timeout_ms: 10_000,
            min_volume: 5,
            window_ms: 10_000,
        }
    }
}

impl BreakerConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn reset_timeout(&self) -> Duration {
        Duration::from_millis(self.reset_timeout_ms)
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Error threshold as a ratio in [0, 1].
    pub fn error_ratio(&self) -> f64 {
        f64::from(self.error_threshold_pct) / 100.0
    }
}

/// Persistence service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string of the persistence service.
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:4000/entities".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
