//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML base file (CONFIG_PATH)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides, SERVICE_IDENTITY et al.)
//!     → validation.rs (semantic checks)
//!     → NodeConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a node's role in the chain (first,
//!   middle, last) is purely a function of its configuration
//! - All fields have defaults to allow minimal configs
//! - Environment variables win over the file so deployments can share one
//!   base file and differ per node

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    BreakerConfig, ChainConfig, FaultConfig, ListenerConfig, NodeConfig, ObservabilityConfig,
    StoreConfig,
};
