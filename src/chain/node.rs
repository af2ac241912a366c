//! Per-hop orchestration.
//!
//! The order of steps is part of the contract:
//! 1. persist the payload (failure is fatal, never retried)
//! 2. fault-injection gate (persistence is NOT rolled back; accepted
//!    partial-failure semantics)
//! 3. hop-limit check (terminal hops never contact the breaker)
//! 4. forward through the circuit breaker
//!
//! Breaker failures of any kind are absorbed into a success response
//! carrying an error envelope, while injected faults propagate as hard
//! errors. That asymmetry is the observed product contract and is pinned by
//! the integration tests.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::chain::envelope::{MessageFormatter, ResponseEnvelope};
use crate::chain::forward::NextHopClient;
use crate::chain::hop::{HopCounter, HopDecision};
use crate::config::NodeConfig;
use crate::observability::metrics;
use crate::resilience::circuit_breaker::BreakerEvent;
use crate::resilience::registry::BreakerRegistry;
use crate::resilience::FaultInjector;
use crate::store::{HttpStore, Store, StoreError};

/// Hard failures of `handle`; everything else degrades gracefully.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Synthetic simulated unavailability; no downstream call was attempted.
    #[error("synthetic fault triggered")]
    FaultInjected,

    /// Persistence failed; no request semantics can proceed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

pub struct ChainNode {
    identity: String,
    hops: HopCounter,
    injector: FaultInjector,
    store: Arc<dyn Store>,
    breakers: Arc<BreakerRegistry>,
    next_hop: NextHopClient,
    formatter: MessageFormatter,
}

impl ChainNode {
    /// Production wiring from configuration: HTTP store client, ambient
    /// randomness for the fault gate, and a breaker registry that logs and
    /// records every event.
    pub fn new(config: &NodeConfig) -> Self {
        let store = Arc::new(HttpStore::new(
            config.store.url.clone(),
            config.identity.clone(),
        ));
        let breakers = Arc::new(
            BreakerRegistry::new(config.breaker.clone())
                .with_observer(Arc::new(observe_breaker_event)),
        );
        Self::from_parts(
            config.identity.clone(),
            HopCounter::new(config.chain.max_hops),
            FaultInjector::from_config(&config.fault),
            store,
            breakers,
            NextHopClient::new(config.chain.next_hop_endpoint.clone()),
        )
    }

    /// Explicit wiring; the seam tests use to inject a deterministic store
    /// and fault source.
    pub fn from_parts(
        identity: String,
        hops: HopCounter,
        injector: FaultInjector,
        store: Arc<dyn Store>,
        breakers: Arc<BreakerRegistry>,
        next_hop: NextHopClient,
    ) -> Self {
        let formatter = MessageFormatter::new(identity.clone());
        Self {
            identity,
            hops,
            injector,
            store,
            breakers,
            next_hop,
            formatter,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    /// Handle one inbound chain request.
    pub async fn handle(
        &self,
        payload: Value,
        hop_count: u32,
    ) -> Result<ResponseEnvelope, ChainError> {
        let entity = self.store.create(payload).await?;
        metrics::record_store_create();

        if self.injector.should_fail() {
            tracing::warn!(
                service = %self.identity,
                entity = %entity.identity,
                "Injected fault, dropping request after persist"
            );
            return Err(ChainError::FaultInjected);
        }

        match self.hops.advance(hop_count) {
            HopDecision::Terminal(final_count) => {
                tracing::info!(
                    service = %self.identity,
                    hop_count = final_count,
                    "Chain terminated at hop limit"
                );
                Ok(self.formatter.success(json!({
                    "msg": "end of chain",
                    "entity": entity,
                })))
            }
            HopDecision::Forward(next_count) => {
                let breaker = self.breakers.get(self.next_hop.endpoint());
                match breaker.fire(|| self.next_hop.forward(next_count, &entity)).await {
                    Ok(downstream) => {
                        tracing::debug!(
                            service = %self.identity,
                            hop_count = next_count,
                            "Relayed to next hop"
                        );
                        Ok(self.formatter.success(json!({ "next": downstream })))
                    }
                    Err(e) => {
                        // Absorbed: degraded, not failed.
                        tracing::warn!(
                            service = %self.identity,
                            hop_count = next_count,
                            error = %e,
                            "Next hop call failed, degrading"
                        );
                        Ok(self.formatter.error(e))
                    }
                }
            }
        }
    }
}

/// Default breaker observer: structured log plus a metrics counter for
/// every outcome and transition. Advisory only.
fn observe_breaker_event(destination: &str, event: BreakerEvent) {
    match event {
        BreakerEvent::Opened => {
            tracing::warn!(destination = %destination, "Breaker opened");
        }
        BreakerEvent::HalfOpened | BreakerEvent::Closed => {
            tracing::info!(destination = %destination, event = event.as_str(), "Breaker transition");
        }
        _ => {
            tracing::debug!(destination = %destination, status = event.as_str(), "Breaker outcome");
        }
    }
    metrics::record_breaker_event(destination, event.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakerConfig;
    use crate::resilience::ChanceSource;
    use crate::store::MemoryStore;

    struct Fixed(f64);

    impl ChanceSource for Fixed {
        fn draw(&self) -> f64 {
            self.0
        }
    }

    fn node_with(
        store: Arc<dyn Store>,
        injector: FaultInjector,
        max_hops: u32,
        endpoint: &str,
    ) -> ChainNode {
        ChainNode::from_parts(
            "order".to_string(),
            HopCounter::new(max_hops),
            injector,
            store,
            Arc::new(BreakerRegistry::new(BreakerConfig::default())),
            NextHopClient::new(endpoint.to_string()),
        )
    }

    fn quiet_injector() -> FaultInjector {
        FaultInjector::new(false, 0.6, Arc::new(Fixed(0.0)))
    }

    #[tokio::test]
    async fn test_terminal_hop_skips_forwarding() {
        let store = Arc::new(MemoryStore::new());
        // Unroutable endpoint: any forward attempt would surface as a
        // degraded (error) envelope, so a success envelope proves none ran.
        let node = node_with(store.clone(), quiet_injector(), 6, "http://127.0.0.1:9/create");

        let envelope = node
            .handle(serde_json::json!({"amount": 12}), 5)
            .await
            .expect("terminal hop must succeed");

        assert!(envelope.error.is_none());
        assert_eq!(envelope.data.as_ref().unwrap()["msg"], "end of chain");
        assert_eq!(store.created_count(), 1);
    }

    #[tokio::test]
    async fn test_fault_fires_after_persist() {
        let store = Arc::new(MemoryStore::new());
        let always = FaultInjector::new(true, -1.0, Arc::new(Fixed(0.0)));
        let node = node_with(store.clone(), always, 6, "http://127.0.0.1:9/create");

        let result = node.handle(serde_json::json!({"amount": 12}), 0).await;

        assert!(matches!(result, Err(ChainError::FaultInjected)));
        // Step order: the entity was persisted before the gate fired.
        assert_eq!(store.created_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        let store = Arc::new(MemoryStore::failing());
        let node = node_with(store, quiet_injector(), 6, "http://127.0.0.1:9/create");

        let result = node.handle(serde_json::json!({"amount": 12}), 0).await;

        assert!(matches!(
            result,
            Err(ChainError::Persistence(StoreError::Unavailable))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_next_hop_degrades_to_error_envelope() {
        let store = Arc::new(MemoryStore::new());
        let node = node_with(store, quiet_injector(), 6, "http://127.0.0.1:9/create");

        let envelope = node
            .handle(serde_json::json!({"amount": 12}), 0)
            .await
            .expect("breaker failures must not escalate");

        assert!(envelope.data.is_none());
        assert!(envelope.error.is_some());
        assert_eq!(envelope.service, "order");
    }
}
