//! Per-destination breaker registry.
//!
//! One breaker per destination endpoint, created at first use and kept for
//! the process lifetime. The registry is shared across concurrent requests;
//! breaker state is never persisted across restarts.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::BreakerConfig;
use crate::resilience::circuit_breaker::{BreakerEvent, CircuitBreaker};

/// Observer receiving events tagged with their destination.
pub type DestinationObserver = Arc<dyn Fn(&str, BreakerEvent) + Send + Sync>;

pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    config: BreakerConfig,
    observer: Option<DestinationObserver>,
}

impl BreakerRegistry {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            config,
            observer: None,
        }
    }

    /// Attach an observer applied to every breaker the registry creates.
    pub fn with_observer(mut self, observer: DestinationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get or create the breaker for a destination.
    pub fn get(&self, destination: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(destination.to_string())
            .or_insert_with(|| {
                let breaker = CircuitBreaker::new(self.config.clone());
                let breaker = match &self.observer {
                    Some(observer) => {
                        let observer = observer.clone();
                        let destination = destination.to_string();
                        breaker.with_observer(Arc::new(move |event| {
                            observer(&destination, event);
                        }))
                    }
                    None => breaker,
                };
                Arc::new(breaker)
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_destination_shares_a_breaker() {
        let registry = BreakerRegistry::new(BreakerConfig::default());
        let a = registry.get("http://next:3000/create");
        let b = registry.get("http://next:3000/create");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_distinct_destinations_get_distinct_breakers() {
        let registry = BreakerRegistry::new(BreakerConfig::default());
        let a = registry.get("http://next:3000/create");
        let b = registry.get("http://other:3000/create");
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
