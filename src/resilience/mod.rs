//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to next hop:
//!     → fault.rs (synthetic fault gate, fires before any forwarding)
//!     → circuit_breaker.rs (admit / reject, bounded execution, outcome
//!       accounting, state transitions)
//!     → registry.rs (one breaker per destination, process lifetime)
//! ```
//!
//! # Design Decisions
//! - Every protected call has a deadline; a timed-out call is abandoned and
//!   its late result discarded
//! - Single probe in half-open state (prevents hammering a recovering
//!   destination)
//! - Fault injection is independent of breaker accounting: a triggered fault
//!   means no downstream call was attempted, so nothing is recorded

pub mod circuit_breaker;
pub mod fault;
pub mod registry;

pub use circuit_breaker::{BreakerError, BreakerEvent, BreakerState, CircuitBreaker};
pub use fault::{ChanceSource, FaultInjector};
pub use registry::BreakerRegistry;
