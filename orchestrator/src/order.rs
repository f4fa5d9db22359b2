//! The intake-facing submission and its outcome (§6 "Intake boundary").

use admission::Order;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Invalid,
    Capacity,
    WindowClosed,
    Preempted,
    PolicyHalted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Accepted { id: String },
    Rejected { id: String, reason: RejectReason },
    RateLimited { id: String },
}

/// `id` must be non-empty; that is the full shape of "malformed order" this
/// boundary validates before anything touches the queue.
pub fn validate(order: &Order) -> bool {
    !order.id.trim().is_empty()
}
