//! In-memory store, for deterministic tests and local demos.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{Store, StoreError, StoredEntity};

#[derive(Default)]
pub struct MemoryStore {
    entities: Mutex<Vec<StoredEntity>>,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `create` fails, for persistence-error paths.
    pub fn failing() -> Self {
        Self {
            entities: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn created_count(&self) -> usize {
        self.entities.lock().expect("entity log poisoned").len()
    }

    pub fn entities(&self) -> Vec<StoredEntity> {
        self.entities.lock().expect("entity log poisoned").clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create(&self, payload: Value) -> Result<StoredEntity, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable);
        }
        let entity = StoredEntity {
            identity: Uuid::new_v4(),
            payload,
        };
        self.entities
            .lock()
            .expect("entity log poisoned")
            .push(entity.clone());
        Ok(entity)
    }
}
