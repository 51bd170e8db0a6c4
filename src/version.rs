use std::fmt;

/// Thin wrapper over the declared `openapi` field (e.g. "3.0.3") providing
/// safe helpers for policy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecVersion(String);

impl SpecVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw declared version string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the major component (X in X.Y[.Z]).
    /// Returns 0 on any parsing issue to keep callers branch-friendly.
    pub fn major(&self) -> u32 {
        let Some((head, _)) = self.0.split_once('.') else {
            return 0;
        };
        head.parse().unwrap_or(0)
    }

    /// Verifies the version follows "X.Y" or "X.Y.Z", where:
    /// - X > 0
    /// - Y >= 0
    /// - Z (optional) >= 0
    ///
    /// Avoids regex: single left-to-right byte scan, no backtracking.
    /// Returns false for empty/whitespace, missing parts, or trailing junk.
    pub fn is_valid(&self) -> bool {
        let s = self.0.trim().as_bytes();
        if s.is_empty() {
            return false;
        }

        let mut i = 0;
        let scan_digits = |i: &mut usize| -> usize {
            let start = *i;
            while *i < s.len() && s[*i].is_ascii_digit() {
                *i += 1;
            }
            *i - start
        };

        // major
        let start = i;
        if scan_digits(&mut i) == 0 {
            return false;
        }
        // Leading zeros are tolerated as long as the value is positive.
        let major: u32 = match std::str::from_utf8(&s[start..i])
            .ok()
            .and_then(|d| d.parse().ok())
        {
            Some(m) => m,
            None => return false,
        };
        if major == 0 {
            return false;
        }

        // '.' between major and minor
        if i >= s.len() || s[i] != b'.' {
            return false;
        }
        i += 1;

        // minor
        if scan_digits(&mut i) == 0 {
            return false;
        }

        // optional ".patch"
        if i == s.len() {
            return true;
        }
        if s[i] != b'.' {
            return false;
        }
        i += 1;
        scan_digits(&mut i) > 0 && i == s.len()
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpecVersion {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_two_component() {
        assert!(SpecVersion::new("3.0").is_valid());
        assert!(SpecVersion::new("3.1").is_valid());
        assert!(SpecVersion::new("10.22").is_valid());
    }

    #[test]
    fn valid_three_component() {
        assert!(SpecVersion::new("3.0.1").is_valid());
        assert!(SpecVersion::new("3.0.0").is_valid());
    }

    #[test]
    fn valid_after_trim() {
        assert!(SpecVersion::new(" 3.0 ").is_valid());
        assert!(SpecVersion::new("\t3.0.3\n").is_valid());
    }

    #[test]
    fn leading_zero_major_is_valid_when_positive() {
        assert!(SpecVersion::new("03.0").is_valid());
    }

    #[test]
    fn zero_major_is_invalid() {
        assert!(!SpecVersion::new("0.1").is_valid());
        assert!(!SpecVersion::new("00.1").is_valid());
    }

    #[test]
    fn missing_minor_is_invalid() {
        assert!(!SpecVersion::new("3").is_valid());
        assert!(!SpecVersion::new("3.").is_valid());
    }

    #[test]
    fn trailing_separator_is_invalid() {
        assert!(!SpecVersion::new("3.0.").is_valid());
    }

    #[test]
    fn non_digit_components_are_invalid() {
        assert!(!SpecVersion::new("3.x").is_valid());
        assert!(!SpecVersion::new("v3.0").is_valid());
        assert!(!SpecVersion::new("3.0.1-rc1").is_valid());
    }

    #[test]
    fn empty_and_whitespace_are_invalid() {
        assert!(!SpecVersion::new("").is_valid());
        assert!(!SpecVersion::new("   ").is_valid());
    }

    #[test]
    fn major_of_valid_versions() {
        assert_eq!(SpecVersion::new("3.0.3").major(), 3);
        assert_eq!(SpecVersion::new("2.0").major(), 2);
        assert_eq!(SpecVersion::new("03.0").major(), 3);
    }

    #[test]
    fn major_returns_zero_on_malformed_input() {
        assert_eq!(SpecVersion::new("").major(), 0);
        assert_eq!(SpecVersion::new("3").major(), 0); // no dot
        assert_eq!(SpecVersion::new("v3.0").major(), 0);
        assert_eq!(SpecVersion::new(".1").major(), 0);
        assert_eq!(SpecVersion::new("x.y").major(), 0);
    }
}
