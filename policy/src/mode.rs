//! Operational mode state machine (C8).
//!
//! The shape follows the corpus's `risk::limits::CircuitBreaker`: an
//! ordered set of states driven by a counted signal against a threshold,
//! with saturation at the extremes rather than wraparound. Unlike the
//! breaker, policy mode has four ordered rungs instead of three states, and
//! climbs or descends one rung at a time rather than jumping straight to
//! the extreme.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolicyMode {
    Normal,
    Watch,
    Restricted,
    Halted,
}

impl PolicyMode {
    fn step_up(self) -> Self {
        match self {
            PolicyMode::Normal => PolicyMode::Watch,
            PolicyMode::Watch => PolicyMode::Restricted,
            PolicyMode::Restricted | PolicyMode::Halted => PolicyMode::Halted,
        }
    }

    fn step_down(self) -> Self {
        match self {
            PolicyMode::Halted => PolicyMode::Restricted,
            PolicyMode::Restricted => PolicyMode::Watch,
            PolicyMode::Watch | PolicyMode::Normal => PolicyMode::Normal,
        }
    }
}

/// Moves one rung up when `failure_burst >= escalation_threshold`
/// (inclusive); saturates at `Halted` rather than overflowing past it.
/// Default `escalation_threshold` per the external interface is 2.
pub fn escalate(current: PolicyMode, failure_burst: u32, escalation_threshold: u32) -> PolicyMode {
    if failure_burst >= escalation_threshold {
        let next = current.step_up();
        if next != current {
            tracing::warn!(?current, ?next, failure_burst, "policy mode escalated");
        }
        next
    } else {
        current
    }
}

/// Moves one rung down when `success_streak >= 2 * mode_threshold`
/// (not 3x — a known-wrong multiplier elsewhere in this corpus). Floors at
/// `Normal`.
pub fn de_escalate(current: PolicyMode, success_streak: u32, mode_threshold: u32) -> PolicyMode {
    if success_streak >= 2 * mode_threshold {
        let next = current.step_down();
        if next != current {
            tracing::info!(?current, ?next, success_streak, "policy mode de-escalated");
        }
        next
    } else {
        current
    }
}
