//! Checkpoint manager (C7).
//!
//! Grounded in the corpus's `ledger::journal::TransactionJournal`, whose
//! `Checkpoint { last_sequence }` operation is appended to the same log as
//! ordinary entries and whose `recover` rebuilds the sequence counter from
//! the highest sequence seen, rejecting `entry.sequence <= last_sequence`.
//! The manager here is the same idea without a journal underneath it: an
//! in-memory, never-regressing high-water mark per id, keyed the same way
//! the journal keys its checksums — one lock, taken once per call.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub sequence: u64,
    pub at: DateTime<Utc>,
}

pub struct CheckpointManager {
    checkpoints: DashMap<String, Checkpoint>,
}

impl CheckpointManager {
    pub fn new() -> Self {
        Self {
            checkpoints: DashMap::new(),
        }
    }

    /// Overwrites the stored checkpoint for `id` iff `seq` is strictly
    /// greater than the existing one. A checkpoint can never regress, so a
    /// late or duplicate `record` for a sequence already committed is a
    /// no-op rather than an error.
    pub fn record(&self, id: &str, seq: u64, at: DateTime<Utc>) {
        self.checkpoints
            .entry(id.to_string())
            .and_modify(|existing| {
                if seq > existing.sequence {
                    existing.sequence = seq;
                    existing.at = at;
                }
            })
            .or_insert(Checkpoint { sequence: seq, at });
    }

    pub fn get(&self, id: &str) -> Option<Checkpoint> {
        self.checkpoints.get(id).map(|entry| *entry)
    }

    /// Merges checkpoints from other managers (or a replicated snapshot),
    /// keeping the maximum `sequence` per id.
    pub fn merge(&self, others: &[(String, Checkpoint)]) {
        for (id, checkpoint) in others {
            self.record(id, checkpoint.sequence, checkpoint.at);
        }
    }

    pub fn snapshot(&self) -> HashMap<String, Checkpoint> {
        self.checkpoints
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for CheckpointManager {
    fn default() -> Self {
        Self::new()
    }
}

/// True iff `current - last >= interval`, inclusive — triggering at exactly
/// `interval` must fire, not wait for the next tick past it.
pub fn should_checkpoint(last: u64, current: u64, interval: u64) -> bool {
    current.saturating_sub(last) >= interval
}

/// Replays only the events strictly past the checkpointed sequence. Events
/// already covered by the checkpoint (`sequence <= checkpoint_seq`) are
/// dropped rather than reapplied.
pub fn reconstruct<'a, T>(events_since_checkpoint: &'a [T], checkpoint_seq: u64, sequence_of: impl Fn(&T) -> u64) -> Vec<&'a T> {
    events_since_checkpoint
        .iter()
        .filter(|event| sequence_of(event) > checkpoint_seq)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_never_downgrades() {
        let manager = CheckpointManager::new();
        let t1 = Utc::now();
        manager.record("wf-1", 10, t1);
        manager.record("wf-1", 5, Utc::now());
        assert_eq!(manager.get("wf-1").unwrap().sequence, 10);
    }

    #[test]
    fn record_advances_on_greater_sequence() {
        let manager = CheckpointManager::new();
        manager.record("wf-1", 10, Utc::now());
        manager.record("wf-1", 11, Utc::now());
        assert_eq!(manager.get("wf-1").unwrap().sequence, 11);
    }

    #[test]
    fn merge_keeps_max_sequence_per_id() {
        let manager = CheckpointManager::new();
        manager.record("wf-1", 5, Utc::now());
        manager.merge(&[
            ("wf-1".to_string(), Checkpoint { sequence: 12, at: Utc::now() }),
            ("wf-2".to_string(), Checkpoint { sequence: 3, at: Utc::now() }),
        ]);
        assert_eq!(manager.get("wf-1").unwrap().sequence, 12);
        assert_eq!(manager.get("wf-2").unwrap().sequence, 3);
    }

    #[test]
    fn should_checkpoint_fires_at_exact_interval() {
        assert!(should_checkpoint(0, 100, 100));
        assert!(!should_checkpoint(0, 99, 100));
        assert!(should_checkpoint(0, 101, 100));
    }

    #[test]
    fn reconstruct_excludes_events_at_or_below_checkpoint() {
        let events = vec![1u64, 2, 3, 4, 5];
        let result = reconstruct(&events, 3, |e| *e);
        assert_eq!(result, vec![&4, &5]);
    }
}
