//! Failover candidate selection (C7).

use std::collections::HashSet;
use std::hash::Hash;

/// `all_nodes \ degraded_set` — the nodes still eligible to take over work
/// from a degraded peer. Returning the intersection instead of the
/// difference is the known inverted-bug form.
pub fn candidates<T>(all_nodes: &[T], degraded_set: &HashSet<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    all_nodes
        .iter()
        .filter(|node| !degraded_set.contains(*node))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_excludes_degraded_nodes() {
        let all = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let degraded: HashSet<String> = ["b".to_string()].into_iter().collect();
        let result = candidates(&all, &degraded);
        assert_eq!(result, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn candidates_is_empty_when_all_degraded() {
        let all = vec![1, 2, 3];
        let degraded: HashSet<i32> = [1, 2, 3].into_iter().collect();
        assert!(candidates(&all, &degraded).is_empty());
    }

    #[test]
    fn candidates_is_full_set_when_none_degraded() {
        let all = vec![1, 2, 3];
        let degraded: HashSet<i32> = HashSet::new();
        assert_eq!(candidates(&all, &degraded), vec![1, 2, 3]);
    }
}
