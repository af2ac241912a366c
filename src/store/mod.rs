//! Persistence boundary.
//!
//! The core treats persistence as an external capability:
//! `create(payload) -> StoredEntity`. The payload is opaque (the chain
//! never inspects its internals) and the stored record is never mutated by
//! the core. There is no enforced timeout here; bounding persistence is the
//! store service's responsibility.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// A persisted record: the opaque payload plus its assigned identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntity {
    pub identity: Uuid,
    pub payload: Value,
}

/// Persistence failure. Unrecoverable for the current request: no request
/// semantics can proceed without a stored record, so this is never retried
/// or hidden.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store rejected entity: status {0}")]
    Rejected(u16),

    #[error("store unavailable")]
    Unavailable,
}

/// Persistence capability.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create(&self, payload: Value) -> Result<StoredEntity, StoreError>;
}
