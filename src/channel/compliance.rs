//! Channel compliance against a version's required set.

use super::types::ChannelSet;

/// Difference between enabled channels and the channels a version requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceResult {
    /// Required channels that are not enabled.
    pub missing: ChannelSet,
    /// Enabled channels outside the required set.
    pub unexpected: ChannelSet,
}

impl ComplianceResult {
    pub fn evaluate(enabled: &ChannelSet, required: &ChannelSet) -> Self {
        Self {
            missing: required.difference(enabled),
            unexpected: enabled.difference(required),
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> ChannelSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_exact_match_is_compliant() {
        let result = ComplianceResult::evaluate(&set(&["a", "b"]), &set(&["b", "a"]));
        assert!(result.is_compliant());
        assert!(result.missing.is_empty());
        assert!(result.unexpected.is_empty());
    }

    #[test]
    fn test_superset_has_unexpected() {
        let result = ComplianceResult::evaluate(&set(&["a", "b", "c"]), &set(&["a", "b"]));
        assert!(!result.is_compliant());
        assert!(result.missing.is_empty());
        assert_eq!(result.unexpected, set(&["c"]));
    }

    #[test]
    fn test_subset_has_missing() {
        let result = ComplianceResult::evaluate(&set(&["a"]), &set(&["a", "b"]));
        assert!(!result.is_compliant());
        assert_eq!(result.missing, set(&["b"]));
        assert!(result.unexpected.is_empty());
    }

    #[test]
    fn test_disjoint_has_both() {
        let result = ComplianceResult::evaluate(&set(&["x", "y"]), &set(&["a", "b"]));
        assert!(!result.is_compliant());
        assert_eq!(result.missing, set(&["a", "b"]));
        assert_eq!(result.unexpected, set(&["x", "y"]));
    }

    #[test]
    fn test_empty_enabled_is_not_compliant() {
        let result = ComplianceResult::evaluate(&ChannelSet::new(), &set(&["a"]));
        assert!(!result.is_compliant());
    }
}
