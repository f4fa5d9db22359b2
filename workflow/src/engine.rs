//! Workflow engine (C9): entities, atomic multi-step transitions, and an
//! append-only audit log.
//!
//! Grounded in the corpus's `orders::service::OrderService` (per-entity
//! status plus an append-only event log keyed by id) generalized from a
//! fixed order-status enum to an arbitrary injected [`Graph`]. Unlike the
//! corpus, which stores each order behind its own `Arc<RwLock<Order>>` and
//! therefore has no way to take "one lock for the whole batch", this engine
//! keeps a single `parking_lot::Mutex` over all entities and the audit log
//! together, so `transition_batch`/`transition_chain` can honor spec.md §5's
//! "bulk operations take the owning mutex exactly once" requirement.

use crate::graph::{Graph, StateTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub entity_id: String,
    pub from: StateTag,
    pub to: StateTag,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub state: StateTag,
    pub history: Vec<TransitionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    InvalidState,
    AlreadyRegistered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    NotFound,
    Illegal,
}

pub type TransitionOutcome = Result<(StateTag, StateTag), TransitionError>;

struct State {
    entities: HashMap<String, Entity>,
    audit: Vec<TransitionRecord>,
}

pub struct WorkflowEngine {
    graph: Graph,
    state: parking_lot::Mutex<State>,
    clock: std::sync::Arc<dyn shared::Clock>,
}

impl WorkflowEngine {
    pub fn new(graph: Graph, clock: std::sync::Arc<dyn shared::Clock>) -> Self {
        Self {
            graph,
            state: parking_lot::Mutex::new(State {
                entities: HashMap::new(),
                audit: Vec::new(),
            }),
            clock,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// `initial` must equal the graph's designated entry state; a caller
    /// defaulting to some other "first" state is a bug this signature
    /// prevents by rejecting it outright.
    pub fn register(&self, entity_id: impl Into<String>, initial: &str) -> Result<(), RegisterError> {
        if initial != self.graph.entry_state() {
            return Err(RegisterError::InvalidState);
        }
        let entity_id = entity_id.into();
        let mut state = self.state.lock();
        if state.entities.contains_key(&entity_id) {
            return Err(RegisterError::AlreadyRegistered);
        }
        state.entities.insert(
            entity_id.clone(),
            Entity {
                id: entity_id,
                state: initial.to_string(),
                history: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn register_default(&self, entity_id: impl Into<String>) -> Result<(), RegisterError> {
        let entry = self.graph.entry_state().to_string();
        self.register(entity_id, &entry)
    }

    pub fn get_state(&self, entity_id: &str) -> Option<StateTag> {
        self.state.lock().entities.get(entity_id).map(|e| e.state.clone())
    }

    pub fn transition(&self, entity_id: &str, to: &str) -> TransitionOutcome {
        let mut state = self.state.lock();
        Self::apply_transition(&self.graph, &mut state, entity_id, to, self.clock.now_utc())
    }

    fn apply_transition(
        graph: &Graph,
        state: &mut State,
        entity_id: &str,
        to: &str,
        at: DateTime<Utc>,
    ) -> TransitionOutcome {
        let entity = state.entities.get_mut(entity_id).ok_or(TransitionError::NotFound)?;
        if !graph.allowed(&entity.state, to) {
            tracing::warn!(entity_id, from = %entity.state, to, "illegal transition attempted");
            return Err(TransitionError::Illegal);
        }
        let from = entity.state.clone();
        let record = TransitionRecord {
            entity_id: entity_id.to_string(),
            from: from.clone(),
            to: to.to_string(),
            at,
        };
        entity.state = to.to_string();
        entity.history.push(record.clone());
        state.audit.push(record);
        tracing::info!(entity_id, from = %from, to, "entity transitioned");
        Ok((from, to.to_string()))
    }

    /// Every attempt is independent; a failure for one id does not affect
    /// the others. The whole batch is applied under one lock acquisition.
    pub fn transition_batch(
        &self,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> HashMap<String, TransitionOutcome> {
        let mut state = self.state.lock();
        let now = self.clock.now_utc();
        let mut results = HashMap::new();
        for (entity_id, to) in entries {
            let outcome = Self::apply_transition(&self.graph, &mut state, &entity_id, &to, now);
            results.insert(entity_id, outcome);
        }
        results
    }

    /// Atomic: if any step in `steps` is illegal, every step applied within
    /// this call is rolled back (state and history restored; the audit log
    /// entries for this call are also trimmed, so no partial chain is ever
    /// observable from outside).
    ///
    /// Each step within the chain is stamped with a distinct, strictly
    /// increasing timestamp (`now` plus the step's index in nanoseconds) —
    /// §3's invariant that `history` is "strictly monotonic in `at`" would
    /// otherwise be violated by a multi-step chain sharing one clock read.
    pub fn transition_chain(
        &self,
        entity_id: &str,
        steps: &[String],
    ) -> Result<Vec<(StateTag, StateTag)>, TransitionError> {
        let mut state = self.state.lock();
        let now = self.clock.now_utc();

        let original = state
            .entities
            .get(entity_id)
            .cloned()
            .ok_or(TransitionError::NotFound)?;
        let audit_len_before = state.audit.len();

        let mut applied = Vec::with_capacity(steps.len());
        for (i, to) in steps.iter().enumerate() {
            let at = now + chrono::Duration::nanoseconds(i as i64);
            match Self::apply_transition(&self.graph, &mut state, entity_id, to, at) {
                Ok(pair) => applied.push(pair),
                Err(e) => {
                    // Roll back: restore the entity exactly as it was before
                    // this call, and trim the audit entries this call added.
                    state.entities.insert(entity_id.to_string(), original);
                    state.audit.truncate(audit_len_before);
                    return Err(e);
                }
            }
        }
        Ok(applied)
    }

    /// Defensive copy; never exposes the internal history buffer.
    pub fn history(&self, entity_id: &str) -> Option<Vec<TransitionRecord>> {
        self.state.lock().entities.get(entity_id).map(|e| e.history.clone())
    }

    /// Defensive copy of the whole audit log.
    pub fn audit_log(&self) -> Vec<TransitionRecord> {
        self.state.lock().audit.clone()
    }

    pub fn active_count(&self) -> usize {
        let state = self.state.lock();
        state
            .entities
            .values()
            .filter(|e| !self.graph.is_terminal(&e.state))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::clock::SystemClock;
    use std::collections::{BTreeSet, HashSet};
    use std::sync::Arc;

    fn maritime_graph() -> Graph {
        let mut edges = HashMap::new();
        edges.insert(
            "queued".to_string(),
            BTreeSet::from(["allocated".to_string(), "cancelled".to_string()]),
        );
        edges.insert(
            "allocated".to_string(),
            BTreeSet::from(["departed".to_string(), "cancelled".to_string()]),
        );
        edges.insert("departed".to_string(), BTreeSet::from(["arrived".to_string()]));
        edges.insert("arrived".to_string(), BTreeSet::from(["completed".to_string()]));
        let terminal = HashSet::from(["cancelled".to_string(), "completed".to_string()]);
        Graph::new(edges, terminal, "queued".to_string())
    }

    fn engine() -> WorkflowEngine {
        WorkflowEngine::new(maritime_graph(), Arc::new(SystemClock))
    }

    #[test]
    fn register_requires_the_entry_state() {
        let engine = engine();
        assert_eq!(engine.register("v1", "allocated"), Err(RegisterError::InvalidState));
        assert_eq!(engine.register("v1", "queued"), Ok(()));
        assert_eq!(engine.register("v1", "queued"), Err(RegisterError::AlreadyRegistered));
    }

    #[test]
    fn terminal_state_rejects_further_transitions() {
        let engine = engine();
        engine.register_default("v1").unwrap();
        engine.transition("v1", "cancelled").unwrap();
        assert_eq!(engine.transition("v1", "allocated"), Err(TransitionError::Illegal));
    }

    #[test]
    fn transition_batch_is_independent_per_entity() {
        let engine = engine();
        engine.register_default("v1").unwrap();
        engine.register_default("v2").unwrap();

        let results = engine.transition_batch([
            ("v1".to_string(), "allocated".to_string()),
            ("v2".to_string(), "arrived".to_string()), // illegal
            ("missing".to_string(), "allocated".to_string()),
        ]);

        assert!(results["v1"].is_ok());
        assert_eq!(results["v2"], Err(TransitionError::Illegal));
        assert_eq!(results["missing"], Err(TransitionError::NotFound));
        assert_eq!(engine.get_state("v1").unwrap(), "allocated");
        assert_eq!(engine.get_state("v2").unwrap(), "queued");
    }

    #[test]
    fn transition_chain_rolls_back_atomically_on_illegal_step() {
        let engine = engine();
        engine.register_default("v1").unwrap();

        let before_history = engine.history("v1").unwrap();
        let before_audit_len = engine.audit_log().len();

        let result = engine.transition_chain(
            "v1",
            &["allocated".to_string(), "completed".to_string() /* illegal */],
        );

        assert_eq!(result, Err(TransitionError::Illegal));
        assert_eq!(engine.get_state("v1").unwrap(), "queued");
        assert_eq!(engine.history("v1").unwrap(), before_history);
        assert_eq!(engine.audit_log().len(), before_audit_len);
    }

    #[test]
    fn transition_chain_applies_every_step_when_all_legal() {
        let engine = engine();
        engine.register_default("v1").unwrap();
        let result = engine
            .transition_chain("v1", &["allocated".to_string(), "departed".to_string()])
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(engine.get_state("v1").unwrap(), "departed");
    }

    #[test]
    fn transition_chain_steps_have_strictly_increasing_timestamps() {
        use shared::clock::FixedClock;
        let clock = Arc::new(FixedClock::new(chrono::Utc::now()));
        let engine = WorkflowEngine::new(maritime_graph(), clock);
        engine.register_default("v1").unwrap();
        engine
            .transition_chain("v1", &["allocated".to_string(), "departed".to_string()])
            .unwrap();
        let history = engine.history("v1").unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[1].at > history[0].at);
    }

    #[test]
    fn active_count_excludes_terminal_entities() {
        let engine = engine();
        engine.register_default("v1").unwrap();
        engine.register_default("v2").unwrap();
        engine.transition("v2", "cancelled").unwrap();
        assert_eq!(engine.active_count(), 1);
    }

    #[test]
    fn history_and_audit_log_are_defensive_copies() {
        let engine = engine();
        engine.register_default("v1").unwrap();
        engine.transition("v1", "allocated").unwrap();
        let mut history = engine.history("v1").unwrap();
        history.clear();
        assert_eq!(engine.history("v1").unwrap().len(), 1);
    }
}
