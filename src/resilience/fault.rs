//! Synthetic fault injection.
//!
//! Simulates upstream unavailability unrelated to real downstream health.
//! The gate fires before any forwarding is attempted, so a triggered fault
//! never touches breaker accounting.

use std::sync::Arc;

use rand::Rng;

use crate::config::FaultConfig;

/// Source of uniform draws in [0, 1).
///
/// Injected so tests can pin the decision instead of relying on ambient
/// randomness.
pub trait ChanceSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Default source backed by the thread-local RNG.
pub struct ThreadRngChance;

impl ChanceSource for ThreadRngChance {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen()
    }
}

/// Stateless probabilistic failure gate.
pub struct FaultInjector {
    enabled: bool,
    trigger_threshold: f64,
    source: Arc<dyn ChanceSource>,
}

impl FaultInjector {
    pub fn new(enabled: bool, trigger_threshold: f64, source: Arc<dyn ChanceSource>) -> Self {
        Self {
            enabled,
            trigger_threshold,
            source,
        }
    }

    pub fn from_config(config: &FaultConfig) -> Self {
        Self::new(
            config.enabled,
            config.trigger_threshold,
            Arc::new(ThreadRngChance),
        )
    }

    /// Draw once; trigger when the draw exceeds the threshold.
    ///
    /// Disabled injectors never trigger and never draw.
    pub fn should_fail(&self) -> bool {
        self.enabled && self.source.draw() > self.trigger_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl ChanceSource for Fixed {
        fn draw(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_disabled_never_triggers() {
        let injector = FaultInjector::new(false, 0.6, Arc::new(Fixed(0.99)));
        assert!(!injector.should_fail());
    }

    #[test]
    fn test_triggers_above_threshold() {
        let injector = FaultInjector::new(true, 0.6, Arc::new(Fixed(0.61)));
        assert!(injector.should_fail());
    }

    #[test]
    fn test_threshold_draw_does_not_trigger() {
        // Strictly-above semantics: a draw equal to the threshold passes.
        let injector = FaultInjector::new(true, 0.6, Arc::new(Fixed(0.6)));
        assert!(!injector.should_fail());
    }
}
