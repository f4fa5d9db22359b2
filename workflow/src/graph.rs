//! State transition graph (C4).
//!
//! Constructed once from a map of allowed successors plus a terminal set,
//! and never mutated afterward — the corpus's "ambient globals / package
//! level maps" pattern (a graph wired in as a module-level constant) is
//! replaced here with an immutable value the caller constructs and injects,
//! per the redesign note in spec.md §9.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

pub type StateTag = String;

#[derive(Debug, Clone)]
pub struct Graph {
    edges: HashMap<StateTag, BTreeSet<StateTag>>,
    terminal: HashSet<StateTag>,
    entry: StateTag,
}

impl Graph {
    /// `entry` is the designated entry state new entities must register
    /// into (spec.md §4.1: "must equal the configured designated-entry
    /// state"). `edges` need not list terminal states as keys.
    pub fn new(
        edges: HashMap<StateTag, BTreeSet<StateTag>>,
        terminal: HashSet<StateTag>,
        entry: StateTag,
    ) -> Self {
        Self {
            edges,
            terminal,
            entry,
        }
    }

    pub fn entry_state(&self) -> &str {
        &self.entry
    }

    pub fn contains(&self, state: &str) -> bool {
        self.edges.contains_key(state) || self.terminal.contains(state)
    }

    /// `false` when `from` is unknown to the graph — unknown states are not
    /// a fault, simply never allowed to transition anywhere.
    pub fn allowed(&self, from: &str, to: &str) -> bool {
        self.edges
            .get(from)
            .map(|successors| successors.contains(to))
            .unwrap_or(false)
    }

    /// Deterministic (lexicographic) successor order, for reproducible
    /// planning and tie-breaking.
    pub fn allowed_from(&self, state: &str) -> Vec<StateTag> {
        self.edges
            .get(state)
            .map(|successors| successors.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_terminal(&self, state: &str) -> bool {
        self.terminal.contains(state)
    }

    /// BFS shortest path; `from == to` returns `[from]`; unreachable targets
    /// return `None`. Ties are broken by the lexicographic successor order
    /// already enumerated by `allowed_from`, so output is deterministic.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<StateTag>> {
        if from == to {
            return Some(vec![from.to_string()]);
        }

        let mut visited: HashSet<StateTag> = HashSet::new();
        visited.insert(from.to_string());
        let mut queue: VecDeque<Vec<StateTag>> = VecDeque::new();
        queue.push_back(vec![from.to_string()]);

        while let Some(path) = queue.pop_front() {
            let last = path.last().expect("path is never empty").clone();
            for next in self.allowed_from(&last) {
                if next == to {
                    let mut full = path.clone();
                    full.push(next);
                    return Some(full);
                }
                if visited.insert(next.clone()) {
                    let mut extended = path.clone();
                    extended.push(next);
                    queue.push_back(extended);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn shortest_path_matches_literal_scenario() {
        let graph = maritime_graph();
        let path = graph.shortest_path("queued", "completed").unwrap();
        assert_eq!(
            path,
            vec!["queued", "allocated", "departed", "arrived", "completed"]
        );
    }

    #[test]
    fn same_state_path_is_singleton() {
        let graph = maritime_graph();
        assert_eq!(graph.shortest_path("queued", "queued"), Some(vec!["queued".to_string()]));
    }

    #[test]
    fn unreachable_target_is_none() {
        let graph = maritime_graph();
        assert_eq!(graph.shortest_path("completed", "queued"), None);
    }

    #[test]
    fn terminal_states_have_no_successors() {
        let graph = maritime_graph();
        assert!(graph.is_terminal("completed"));
        assert!(graph.allowed_from("completed").is_empty());
    }

    #[test]
    fn unknown_from_state_is_not_a_fault() {
        let graph = maritime_graph();
        assert!(!graph.allowed("unknown", "queued"));
        assert!(graph.allowed_from("unknown").is_empty());
    }
}
