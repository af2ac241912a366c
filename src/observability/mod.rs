//! Observability subsystem.
//!
//! Structured logging goes through `tracing` (initialized in `main`);
//! counters and histograms go through the `metrics` facade with an optional
//! Prometheus exporter. Breaker events arrive here via the registry
//! observer and are advisory only.

pub mod metrics;
