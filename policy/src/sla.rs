//! SLA compliance and metadata lookup (C8).

use std::collections::HashMap;
use std::time::Duration;

/// Compliant iff `elapsed <= target` — inclusive, not strict. An entity
/// that lands exactly on its deadline still meets its SLA.
pub fn sla_compliant(elapsed: Duration, target: Duration) -> bool {
    elapsed <= target
}

/// Percentage of entities meeting their SLA. Guards `total <= 0` to `0.0`
/// (not `< 0` — a `total` of exactly zero must not divide).
pub fn sla_percentage(compliant: u64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (compliant as f64 / total as f64) * 100.0
}

/// Case-insensitive metadata lookup. Keys are compared by ASCII-lowercased
/// form so `"Region"` and `"region"` resolve to the same entry.
pub fn metadata_lookup<'a>(metadata: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    let key_lower = key.to_ascii_lowercase();
    metadata
        .iter()
        .find(|(k, _)| k.to_ascii_lowercase() == key_lower)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sla_compliant_is_inclusive_at_target() {
        assert!(sla_compliant(Duration::from_secs(10), Duration::from_secs(10)));
        assert!(!sla_compliant(Duration::from_millis(10001), Duration::from_secs(10)));
    }

    #[test]
    fn sla_percentage_guards_non_positive_total() {
        assert_eq!(sla_percentage(0, 0), 0.0);
        assert_eq!(sla_percentage(5, -1), 0.0);
    }

    #[test]
    fn sla_percentage_computes_ratio() {
        assert_eq!(sla_percentage(50, 100), 50.0);
    }

    #[test]
    fn metadata_lookup_ignores_case() {
        let mut metadata = HashMap::new();
        metadata.insert("Region".to_string(), "us-east".to_string());
        assert_eq!(metadata_lookup(&metadata, "region"), Some("us-east"));
        assert_eq!(metadata_lookup(&metadata, "REGION"), Some("us-east"));
        assert_eq!(metadata_lookup(&metadata, "zone"), None);
    }
}
