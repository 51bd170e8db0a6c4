use std::collections::BTreeSet;

/// Acceptance policy over OpenAPI *major* versions.
///
/// Built once from configuration, read-only afterwards. Suitable for sharing
/// across concurrent imports without locking.
#[derive(Debug, Clone)]
pub struct VersionPolicy {
    supported: BTreeSet<u32>,
}

impl VersionPolicy {
    /// Builds a policy from a raw list of majors.
    /// Duplicates and non-positive values are ignored; the result is canonical.
    pub fn new(majors: &[i64]) -> Self {
        let supported = majors
            .iter()
            .filter_map(|&m| u32::try_from(m).ok())
            .filter(|&m| m > 0)
            .collect();
        Self { supported }
    }

    /// Reports whether a major version is allowed.
    pub fn is_supported(&self, major: u32) -> bool {
        self.supported.contains(&major)
    }

    /// Allowed majors in ascending order.
    /// Suitable for logs, telemetry and error messages.
    pub fn supported_versions(&self) -> Vec<u32> {
        self.supported.iter().copied().collect()
    }

    /// Renders majors as a human-friendly list, e.g. "3.x, 4.x".
    pub fn format_versions(&self) -> String {
        self.supported
            .iter()
            .map(|m| format!("{m}.x"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_duplicates_and_non_positive() {
        let policy = VersionPolicy::new(&[3, 3, 1, -2, 4, 0]);
        assert_eq!(policy.supported_versions(), vec![1, 3, 4]);
    }

    #[test]
    fn membership() {
        let policy = VersionPolicy::new(&[3]);
        assert!(policy.is_supported(3));
        assert!(!policy.is_supported(2));
        assert!(!policy.is_supported(0));
    }

    #[test]
    fn format_versions_renders_majors() {
        let policy = VersionPolicy::new(&[3, 1, 4]);
        assert_eq!(policy.format_versions(), "1.x, 3.x, 4.x");
    }

    #[test]
    fn empty_policy_formats_as_empty_string() {
        let policy = VersionPolicy::new(&[]);
        assert!(policy.supported_versions().is_empty());
        assert_eq!(policy.format_versions(), "");
    }
}
