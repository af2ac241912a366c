//! Next-hop client.
//!
//! Performs the downstream POST carrying the stored entity and the advanced
//! hop count. Only ever invoked through the circuit breaker, which bounds
//! its execution time; no timeout is configured on the client itself.

use serde_json::Value;
use thiserror::Error;

use crate::store::StoredEntity;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("next hop request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("next hop returned status {0}")]
    Status(u16),
}

pub struct NextHopClient {
    client: reqwest::Client,
    endpoint: String,
}

impl NextHopClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the entity to the next hop, returning the downstream body.
    pub async fn forward(
        &self,
        hop_count: u32,
        entity: &StoredEntity,
    ) -> Result<Value, ForwardError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("count", hop_count)])
            .json(entity)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
