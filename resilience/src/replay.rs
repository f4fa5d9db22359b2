//! Deduplicated, idempotent event replay (C7).
//!
//! The corpus's `orders::service::rebuild_order_from_events` sorts events by
//! wall-clock `timestamp`, which it itself notes is vulnerable to clock
//! skew. Replay here keys strictly on the monotonic `sequence` field and
//! the dedup key fully serializes it as a decimal string (`id + "#" +
//! sequence`) rather than casting it through a `char`/`rune`, which the
//! corpus's `ob-poc` sibling's dedup maps do for similar lookup keys and
//! which silently collides above codepoint 127.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub sequence: u64,
    pub payload: Vec<u8>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

fn dedup_key(id: &str, sequence: u64) -> String {
    format!("{id}#{sequence}")
}

/// For each distinct `id`, keeps the event with the maximum `sequence`.
/// Output is ordered deterministically by ascending `id`.
pub fn deduplicate(events: &[Event]) -> Vec<Event> {
    use std::collections::HashMap;

    let mut best: HashMap<&str, &Event> = HashMap::new();
    for event in events {
        best.entry(event.id.as_str())
            .and_modify(|current| {
                if event.sequence > current.sequence {
                    *current = event;
                }
            })
            .or_insert(event);
    }

    let mut ids: Vec<&str> = best.keys().copied().collect();
    ids.sort_unstable();
    ids.into_iter().map(|id| best[id].clone()).collect()
}

/// `replay` is deduplication with the same contract — the corpus's services
/// call the equivalent operation `replay` at the ingestion boundary and
/// `deduplicate` internally; both must behave identically per spec.md §3.
pub fn replay(events: &[Event]) -> Vec<Event> {
    deduplicate(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(id: &str, sequence: u64) -> Event {
        Event {
            id: id.to_string(),
            sequence,
            payload: vec![],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn dedup_keeps_max_sequence_per_id() {
        let events = vec![event("X", 100), event("X", 150), event("X", 120)];
        let result = deduplicate(&events);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sequence, 150);
    }

    #[test]
    fn output_is_ordered_by_ascending_id() {
        let events = vec![event("b", 1), event("a", 1), event("c", 1)];
        let result = deduplicate(&events);
        let ids: Vec<_> = result.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn dedup_key_distinguishes_sequences_above_127() {
        assert_ne!(dedup_key("x", 127), dedup_key("x", 128));
        assert_ne!(dedup_key("x", 200), dedup_key("x", 72)); // 72 is 'H' as a char, 200 is not ASCII
    }

    #[test]
    fn replay_matches_deduplicate() {
        let events = vec![event("X", 1), event("X", 2)];
        assert_eq!(
            replay(&events).iter().map(|e| e.sequence).collect::<Vec<_>>(),
            deduplicate(&events).iter().map(|e| e.sequence).collect::<Vec<_>>()
        );
    }
}
