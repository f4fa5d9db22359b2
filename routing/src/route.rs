//! Route scoring, selection, and feasibility (C6).
//!
//! Keyed state mirrors the corpus's `risk::calculator::RiskCalculator`
//! (several `DashMap<String, _>` tables keyed by symbol/channel) adapted to
//! a routing corridor. The scoring and selection bugs this spec calls out
//! (maximum instead of minimum score, inverted feasibility bound) are
//! intentionally *not* reproduced: `choose` picks the minimum score and
//! `feasible` keeps strictly-less-than routes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub channel: String,
    pub latency_ms: i64,
    pub reliability: f64,
    pub blocked: bool,
    pub active: bool,
}

const RELIABILITY_EPSILON: f64 = 1e-9;

/// Lower is better. `reliability <= 0` is treated as maximally unreliable.
pub fn score(route: &Route) -> f64 {
    if route.reliability <= 0.0 {
        return f64::INFINITY;
    }
    route.latency_ms as f64 / route.reliability.max(RELIABILITY_EPSILON)
}

/// Excludes blocked channels and negative-latency routes, then returns the
/// minimum-scoring survivor, breaking ties by ascending channel name.
pub fn choose<'a>(routes: &'a [Route], blocked: &HashSet<String>) -> Option<&'a Route> {
    let chosen = routes
        .iter()
        .filter(|r| !r.blocked && !blocked.contains(&r.channel) && r.latency_ms >= 0)
        .min_by(|a, b| {
            score(a)
                .partial_cmp(&score(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.channel.cmp(&b.channel))
        });
    match chosen {
        Some(route) => tracing::info!(channel = %route.channel, score = score(route), "corridor chosen"),
        None => tracing::warn!(candidates = routes.len(), "no eligible corridor: all blocked or negative latency"),
    }
    chosen
}

/// Strictly-less-than `max_latency` — the inverted (`>`) form was a known
/// bug.
pub fn feasible<'a>(routes: &'a [Route], max_latency: i64) -> Vec<&'a Route> {
    routes.iter().filter(|r| r.latency_ms < max_latency).collect()
}

/// `utilization / capacity`, clamped to `[0, 1]`.
pub fn congestion_score(utilization: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 1.0;
    }
    (utilization / capacity).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(channel: &str, latency_ms: i64, reliability: f64) -> Route {
        Route {
            channel: channel.to_string(),
            latency_ms,
            reliability,
            blocked: false,
            active: true,
        }
    }

    #[test]
    fn choose_picks_minimum_score_not_maximum() {
        let routes = vec![route("P", 120, 1.0), route("A", 450, 1.0), route("B", 890, 1.0)];
        let chosen = choose(&routes, &HashSet::new()).unwrap();
        assert_eq!(chosen.channel, "P");
    }

    #[test]
    fn choose_excludes_blocked_and_negative_latency() {
        let mut routes = vec![route("P", 120, 1.0), route("A", 10, 1.0)];
        routes[1].blocked = true;
        let blocked = HashSet::new();
        let chosen = choose(&routes, &blocked).unwrap();
        assert_eq!(chosen.channel, "P");

        let routes = vec![route("N", -5, 1.0)];
        assert!(choose(&routes, &HashSet::new()).is_none());
    }

    #[test]
    fn choose_ties_break_on_channel_name() {
        let routes = vec![route("Z", 100, 1.0), route("A", 100, 1.0)];
        let chosen = choose(&routes, &HashSet::new()).unwrap();
        assert_eq!(chosen.channel, "A");
    }

    #[test]
    fn zero_reliability_scores_as_infinite() {
        let r = route("X", 10, 0.0);
        assert_eq!(score(&r), f64::INFINITY);
    }

    #[test]
    fn feasible_is_strict_less_than() {
        let routes = vec![route("A", 100, 1.0), route("B", 100, 1.0), route("C", 50, 1.0)];
        let feasible = feasible(&routes, 100);
        assert_eq!(feasible.len(), 1);
        assert_eq!(feasible[0].channel, "C");
    }

    #[test]
    fn congestion_score_is_clamped() {
        assert_eq!(congestion_score(150.0, 100.0), 1.0);
        assert_eq!(congestion_score(-10.0, 100.0), 0.0);
        assert_eq!(congestion_score(50.0, 100.0), 0.5);
        assert_eq!(congestion_score(10.0, 0.0), 1.0);
    }
}
