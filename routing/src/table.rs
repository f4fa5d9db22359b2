//! Corridor table: the set of known routes keyed by channel.
//!
//! Grounded in the corpus's `risk::calculator::RiskCalculator` pattern of
//! several independently-keyed `DashMap`s — here a single one, since routes
//! are looked up and updated independently of each other and no operation
//! needs a whole-table lock.

use crate::route::{choose, feasible, Route};
use dashmap::DashMap;
use std::collections::HashSet;

pub struct RouteTable {
    routes: DashMap<String, Route>,
    blocked: DashMap<String, ()>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
            blocked: DashMap::new(),
        }
    }

    pub fn upsert(&self, route: Route) {
        self.routes.insert(route.channel.clone(), route);
    }

    pub fn block(&self, channel: &str) {
        self.blocked.insert(channel.to_string(), ());
    }

    pub fn unblock(&self, channel: &str) {
        self.blocked.remove(channel);
    }

    fn snapshot(&self) -> Vec<Route> {
        self.routes.iter().map(|entry| entry.value().clone()).collect()
    }

    fn blocked_set(&self) -> HashSet<String> {
        self.blocked.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn choose_best(&self) -> Option<Route> {
        let routes = self.snapshot();
        let blocked = self.blocked_set();
        choose(&routes, &blocked).cloned()
    }

    pub fn feasible_routes(&self, max_latency: i64) -> Vec<Route> {
        let routes = self.snapshot();
        feasible(&routes, max_latency).into_iter().cloned().collect()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
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
    fn blocked_channels_are_excluded_from_selection() {
        let table = RouteTable::new();
        table.upsert(route("P", 120, 1.0));
        table.upsert(route("A", 10, 1.0));
        table.block("A");

        let chosen = table.choose_best().unwrap();
        assert_eq!(chosen.channel, "P");
    }

    #[test]
    fn unblocking_restores_eligibility() {
        let table = RouteTable::new();
        table.upsert(route("A", 10, 1.0));
        table.block("A");
        assert!(table.choose_best().is_none());
        table.unblock("A");
        assert_eq!(table.choose_best().unwrap().channel, "A");
    }

    #[test]
    fn feasible_routes_respects_max_latency() {
        let table = RouteTable::new();
        table.upsert(route("fast", 50, 1.0));
        table.upsert(route("slow", 500, 1.0));
        let feasible = table.feasible_routes(100);
        assert_eq!(feasible.len(), 1);
        assert_eq!(feasible[0].channel, "fast");
    }
}
