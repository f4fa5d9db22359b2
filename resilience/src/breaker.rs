//! Three-state circuit breaker (C7).
//!
//! The corpus's `risk::limits::CircuitBreaker` spreads its state across four
//! independently-locked fields (`failure_count`, `success_count`, `state`,
//! `last_failure`), each updated under its own lock acquisition. Two
//! callers can interleave a `record_failure` and an `allow_request` such
//! that the trip threshold is read stale, and `get_circuit_breaker` even
//! reconstructs a breaker by copying each field out from under a different
//! lock one at a time, which is not a consistent snapshot of anything. Here
//! all of it — state, counters, the open timestamp, and the in-flight probe
//! count — lives behind one `parking_lot::Mutex`, taken once per call.

use shared::clock::Clock;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u64,
    consecutive_successes: u64,
    open_since: Option<std::time::Instant>,
    probes_in_flight: u32,
}

pub struct CircuitBreaker {
    inner: parking_lot::Mutex<Inner>,
    failure_threshold: u64,
    success_threshold: u64,
    reset_timeout: Duration,
    max_probe_requests: u32,
    clock: Arc<dyn Clock>,
}

impl CircuitBreaker {
    pub fn new(
        failure_threshold: u64,
        success_threshold: u64,
        reset_timeout: Duration,
        max_probe_requests: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: parking_lot::Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                open_since: None,
                probes_in_flight: 0,
            }),
            failure_threshold,
            success_threshold,
            reset_timeout,
            max_probe_requests,
            clock,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().state
    }

    /// Whether a request may proceed right now. `Open` transitions itself
    /// to `HalfOpen` once `reset_timeout` has elapsed, admitting the
    /// caller as the first probe. `HalfOpen` admits up to
    /// `max_probe_requests` concurrently outstanding probes; callers that
    /// are denied do not count against that budget.
    pub fn allow(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner
                    .open_since
                    .map(|since| self.clock.now_monotonic().saturating_duration_since(since))
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.reset_timeout {
                    inner.state = CircuitState::HalfOpen;
                    inner.consecutive_successes = 0;
                    inner.probes_in_flight = 1;
                    tracing::info!("circuit breaker reset timeout elapsed, probing half-open");
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.probes_in_flight < self.max_probe_requests {
                    inner.probes_in_flight += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record the outcome of a probe previously admitted by `allow` while
    /// the breaker was `HalfOpen`. No-op if the breaker is not half-open
    /// (a success/failure recorded in `Closed` or `Open` never touches the
    /// probe budget).
    fn release_probe(&self, inner: &mut Inner) {
        if inner.state == CircuitState::HalfOpen {
            inner.probes_in_flight = inner.probes_in_flight.saturating_sub(1);
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                inner.consecutive_successes += 1;
                self.release_probe(&mut inner);
                if inner.consecutive_successes >= self.success_threshold {
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.consecutive_successes = 0;
                    inner.open_since = None;
                    inner.probes_in_flight = 0;
                    tracing::info!("circuit breaker closed after successful probes");
                }
            }
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.open_since = Some(self.clock.now_monotonic());
                    tracing::warn!(
                        consecutive_failures = inner.consecutive_failures,
                        "circuit breaker tripped open"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.release_probe(&mut inner);
                inner.state = CircuitState::Open;
                inner.open_since = Some(self.clock.now_monotonic());
                inner.consecutive_successes = 0;
                tracing::warn!("probe failed while half-open, circuit breaker reopened");
            }
            CircuitState::Open => {}
        }
    }
}
