//! Error kinds shared across every dispatch orchestrator crate (spec §7).
//!
//! Validation and planner errors are returned as values, never thrown as
//! exceptions; only [`ErrorKind::Internal`] represents a non-recoverable
//! invariant violation worth logging loudly at the call site.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    IllegalTransition,
    CapacityExceeded,
    RateLimited,
    CircuitOpen,
    PolicyDenied,
    Conflict,
    Internal,
}

/// The user-visible response shape: `{kind, reason_code, hint}`, never a
/// stack trace.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("{kind:?}: {reason_code}")]
pub struct DispatchError {
    pub kind: ErrorKind,
    pub reason_code: &'static str,
    pub hint: Option<String>,
}

impl DispatchError {
    pub fn new(kind: ErrorKind, reason_code: &'static str) -> Self {
        Self {
            kind,
            reason_code,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn invalid_input(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::InvalidInput, reason_code)
    }

    pub fn not_found(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::NotFound, reason_code)
    }

    pub fn illegal_transition(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::IllegalTransition, reason_code)
    }

    pub fn capacity_exceeded(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::CapacityExceeded, reason_code)
    }

    pub fn rate_limited(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::RateLimited, reason_code)
    }

    pub fn circuit_open(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::CircuitOpen, reason_code)
    }

    pub fn policy_denied(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::PolicyDenied, reason_code)
    }

    pub fn conflict(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::Conflict, reason_code)
    }

    pub fn internal(reason_code: &'static str) -> Self {
        Self::new(ErrorKind::Internal, reason_code)
    }
}
