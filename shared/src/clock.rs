//! Injectable time source (C1).
//!
//! Every component that needs to reason about elapsed time or wall-clock
//! timestamps takes a `Arc<dyn Clock>` instead of calling `Instant::now()` /
//! `Utc::now()` directly, so breaker timeouts, rate-limiter refills, and SLA
//! checks can be driven deterministically in tests.

use chrono::{DateTime, Utc};
use std::time::Instant;

pub trait Clock: Send + Sync {
    fn now_monotonic(&self) -> Instant;
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_monotonic(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that can be advanced manually, for deterministic tests of
/// time-dependent components (circuit breaker reset timeout, rate limiter
/// refill, SLA tracker).
pub struct FixedClock {
    monotonic: parking_lot::Mutex<Instant>,
    utc: parking_lot::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(utc: DateTime<Utc>) -> Self {
        Self {
            monotonic: parking_lot::Mutex::new(Instant::now()),
            utc: parking_lot::Mutex::new(utc),
        }
    }

    pub fn advance(&self, delta: std::time::Duration) {
        let mut m = self.monotonic.lock();
        *m += delta;
        let mut u = self.utc.lock();
        *u = *u + chrono::Duration::from_std(delta).unwrap_or_default();
    }
}

impl Clock for FixedClock {
    fn now_monotonic(&self) -> Instant {
        *self.monotonic.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc.lock()
    }
}
