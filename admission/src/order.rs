//! The admitted unit of work (C10).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

/// Immutable once accepted; `id` is the uniqueness key. `eta` is an
/// ISO-8601 timestamp and is compared lexicographically as a string
/// rather than parsed — a Zulu-formatted ISO-8601 string sorts identically
/// to its chronological order, so this is exact, not an approximation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub urgency: u32,
    pub eta: String,
    pub deadline: Option<i64>,
    pub window: Option<Window>,
}
