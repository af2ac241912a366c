//! Circuit breaker for next-hop protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: destination assumed down, calls fail fast
//! - Half-Open: testing if destination recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure ratio ≥ threshold within window, volume ≥ minimum
//! Open → Half-Open: after reset timeout, next call becomes the trial
//! Half-Open → Closed: trial call succeeds (counters reset)
//! Half-Open → Open: trial call fails or times out (timer restarts)
//! ```
//!
//! All transitions are driven by call outcomes and elapsed time; there is no
//! external mutation. State lives behind a `std::sync::Mutex` that is never
//! held across an await point, which makes the admit decision and the
//! half-open single-trial reservation atomic under concurrent arrivals.
//! Observers are notified outside the lock and cannot affect control flow.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::BreakerConfig;

/// Breaker status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// Observable breaker outcomes and transitions, advisory only.
///
/// Mirrors the full event surface a monitoring collaborator cares about:
/// per-call outcomes (`Success`, `Failure`, `Timeout`, `Reject`) and state
/// transitions (`Opened`, `HalfOpened`, `Closed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerEvent {
    Success,
    Failure,
    Timeout,
    Reject,
    Opened,
    HalfOpened,
    Closed,
}

impl BreakerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerEvent::Success => "success",
            BreakerEvent::Failure => "failure",
            BreakerEvent::Timeout => "timeout",
            BreakerEvent::Reject => "reject",
            BreakerEvent::Opened => "open",
            BreakerEvent::HalfOpened => "half_open",
            BreakerEvent::Closed => "close",
        }
    }
}

/// Error returned by [`CircuitBreaker::fire`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker rejected the call without contacting the destination.
    #[error("circuit open: call rejected")]
    Open,

    /// The call exceeded the bounded execution timeout and was abandoned.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// The call was attempted and failed.
    #[error(transparent)]
    Inner(E),
}

/// Observer callback for breaker events.
pub type EventObserver = Arc<dyn Fn(BreakerEvent) + Send + Sync>;

/// Rolling statistics window. Counts reset once the window elapses.
#[derive(Debug)]
struct Window {
    started_at: Instant,
    successes: u32,
    failures: u32,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            started_at: now,
            successes: 0,
            failures: 0,
        }
    }

    fn roll(&mut self, now: Instant, length: Duration) {
        if now.duration_since(self.started_at) >= length {
            *self = Self::new(now);
        }
    }

    fn total(&self) -> u32 {
        self.successes + self.failures
    }

    fn failure_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            f64::from(self.failures) / f64::from(self.total())
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    window: Window,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// How a call was admitted; a `Trial` outcome decides the half-open verdict.
#[derive(Debug, Clone, Copy)]
enum Admission {
    Normal,
    Trial,
}

/// Circuit breaker protecting calls to a single downstream destination.
pub struct CircuitBreaker {
    inner: Mutex<Inner>,
    config: BreakerConfig,
    observer: Option<EventObserver>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                window: Window::new(Instant::now()),
                opened_at: None,
                trial_in_flight: false,
            }),
            config,
            observer: None,
        }
    }

    /// Attach an observer for transition/outcome events.
    pub fn with_observer(mut self, observer: EventObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current status.
    pub fn state(&self) -> BreakerState {
        self.lock().state
    }

    /// Execute `op` under breaker protection.
    ///
    /// The call is subject to the configured execution timeout; exceeding it
    /// counts as a failure and the in-flight future is dropped, so a late
    /// result is discarded. When the breaker is open (or a half-open trial
    /// is already in flight) the call is rejected immediately with
    /// [`BreakerError::Open`] and the destination is never contacted.
    pub async fn fire<F, Fut, T, E>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let admission = match self.admit() {
            Some(admission) => admission,
            None => {
                self.emit(&[BreakerEvent::Reject]);
                return Err(BreakerError::Open);
            }
        };

        let timeout = self.config.call_timeout();
        match tokio::time::timeout(timeout, op()).await {
            Ok(Ok(value)) => {
                self.record_success(admission);
                Ok(value)
            }
            Ok(Err(e)) => {
                self.record_failure(admission, BreakerEvent::Failure);
                Err(BreakerError::Inner(e))
            }
            Err(_) => {
                self.record_failure(admission, BreakerEvent::Timeout);
                Err(BreakerError::Timeout(timeout))
            }
        }
    }

    /// Decide whether a call may proceed. Also performs the time-driven
    /// Open → HalfOpen transition, reserving the single trial slot.
    fn admit(&self) -> Option<Admission> {
        let mut events = Vec::new();
        let admission = {
            let mut inner = self.lock();
            match inner.state {
                BreakerState::Closed => Some(Admission::Normal),
                BreakerState::Open => {
                    let elapsed = inner
                        .opened_at
                        .map(|at| at.elapsed())
                        .unwrap_or(Duration::ZERO);
                    if elapsed >= self.config.reset_timeout() {
                        inner.state = BreakerState::HalfOpen;
                        inner.trial_in_flight = true;
                        events.push(BreakerEvent::HalfOpened);
                        Some(Admission::Trial)
                    } else {
                        None
                    }
                }
                BreakerState::HalfOpen => {
                    if inner.trial_in_flight {
                        None
                    } else {
                        inner.trial_in_flight = true;
                        Some(Admission::Trial)
                    }
                }
            }
        };
        self.emit(&events);
        admission
    }

    fn record_success(&self, admission: Admission) {
        let mut events = vec![BreakerEvent::Success];
        {
            let mut inner = self.lock();
            match admission {
                Admission::Trial => {
                    inner.state = BreakerState::Closed;
                    inner.trial_in_flight = false;
                    inner.opened_at = None;
                    inner.window = Window::new(Instant::now());
                    events.push(BreakerEvent::Closed);
                }
                Admission::Normal => {
                    if inner.state == BreakerState::Closed {
                        let now = Instant::now();
                        inner.window.roll(now, self.config.window());
                        inner.window.successes += 1;
                    }
                }
            }
        }
        self.emit(&events);
    }

    fn record_failure(&self, admission: Admission, outcome: BreakerEvent) {
        let mut events = vec![outcome];
        {
            let mut inner = self.lock();
            let now = Instant::now();
            match admission {
                Admission::Trial => {
                    inner.state = BreakerState::Open;
                    inner.trial_in_flight = false;
                    inner.opened_at = Some(now);
                    events.push(BreakerEvent::Opened);
                }
                Admission::Normal => {
                    if inner.state == BreakerState::Closed {
                        inner.window.roll(now, self.config.window());
                        inner.window.failures += 1;
                        if inner.window.total() >= self.config.min_volume
                            && inner.window.failure_ratio() >= self.config.error_ratio()
                        {
                            inner.state = BreakerState::Open;
                            inner.opened_at = Some(now);
                            events.push(BreakerEvent::Opened);
                        }
                    }
                }
            }
        }
        self.emit(&events);
    }

    fn emit(&self, events: &[BreakerEvent]) {
        if let Some(observer) = &self.observer {
            for event in events {
                observer(*event);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("breaker state mutex poisoned")
    }

    #[cfg(test)]
    fn window_counts(&self) -> (u32, u32) {
        let inner = self.lock();
        (inner.window.successes, inner.window.failures)
    }
}
