//! HTTP-backed store client.
//!
//! Assigns the entity identity locally (uuid v4) and POSTs the full record
//! to the persistence service named by `STORE_URL`.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{Store, StoreError, StoredEntity};

pub struct HttpStore {
    client: reqwest::Client,
    url: String,
    service: String,
}

impl HttpStore {
    pub fn new(url: String, service: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            service,
        }
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn create(&self, payload: Value) -> Result<StoredEntity, StoreError> {
        let entity = StoredEntity {
            identity: Uuid::new_v4(),
            payload,
        };

        tracing::debug!(
            service = %self.service,
            entity = %entity.identity,
            "Saving entity"
        );

        let response = self.client.post(&self.url).json(&entity).send().await?;

        if !response.status().is_success() {
            tracing::error!(
                service = %self.service,
                entity = %entity.identity,
                status = %response.status(),
                "Store rejected entity"
            );
            return Err(StoreError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(
            service = %self.service,
            entity = %entity.identity,
            "Entity saved"
        );
        Ok(entity)
    }
}
