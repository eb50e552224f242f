//! Admin API version selection.

use crate::error::ConfigError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Admin API version used to build `/admin/api/{version}/...` paths.
///
/// Shopify publishes a stable version every quarter. Versions this crate
/// knows about get a variant; anything else in `YYYY-MM` form parses as
/// [`ApiVersion::Custom`].
///
/// ```rust
/// use shopify_admin::ApiVersion;
///
/// let version: ApiVersion = "2025-07".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2025_07);
/// assert_eq!(version.to_string(), "2025-07");
/// assert!(ApiVersion::V2025_01 < ApiVersion::latest());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// 2024-10
    V2024_10,
    /// 2025-01
    V2025_01,
    /// 2025-04
    V2025_04,
    /// 2025-07
    V2025_07,
    /// 2025-10
    V2025_10,
    /// The rolling `unstable` version.
    Unstable,
    /// A `YYYY-MM` version not known to this crate.
    Custom(String),
}

const STABLE: [(ApiVersion, &str); 5] = [
    (ApiVersion::V2024_10, "2024-10"),
    (ApiVersion::V2025_01, "2025-01"),
    (ApiVersion::V2025_04, "2025-04"),
    (ApiVersion::V2025_07, "2025-07"),
    (ApiVersion::V2025_10, "2025-10"),
];

impl ApiVersion {
    /// The newest stable version this crate was released against.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2025_10
    }

    /// Returns `false` for `Unstable` and `Custom`.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Unstable | Self::Custom(_))
    }

    /// Returns the version as it appears in request paths.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unstable => "unstable",
            Self::Custom(raw) => raw,
            known => STABLE
                .iter()
                .find(|(version, _)| version == known)
                .map_or("unstable", |(_, raw)| *raw),
        }
    }

    // Known versions sort by release; custom versions sort by their string
    // among themselves and after everything else.
    fn rank(&self) -> usize {
        match self {
            Self::Unstable => STABLE.len(),
            Self::Custom(_) => STABLE.len() + 1,
            known => STABLE
                .iter()
                .position(|(version, _)| version == known)
                .unwrap_or(0),
        }
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "unstable" {
            return Ok(Self::Unstable);
        }
        if let Some((version, _)) = STABLE.iter().find(|(_, raw)| *raw == s) {
            return Ok(version.clone());
        }
        if is_quarterly_release(&s) {
            Ok(Self::Custom(s))
        } else {
            Err(ConfigError::InvalidApiVersion { version: s })
        }
    }
}

fn is_quarterly_release(s: &str) -> bool {
    match s.split_once('-') {
        Some((year, month)) => {
            year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && matches!(month, "01" | "04" | "07" | "10")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_known_and_unstable_versions() {
        assert_eq!("2024-10".parse::<ApiVersion>().unwrap(), ApiVersion::V2024_10);
        assert_eq!(" 2025-10 ".parse::<ApiVersion>().unwrap(), ApiVersion::V2025_10);
        assert_eq!("UNSTABLE".parse::<ApiVersion>().unwrap(), ApiVersion::Unstable);
    }

    #[test]
    fn test_future_version_parses_as_custom() {
        let version: ApiVersion = "2026-04".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2026-04".to_string()));
        assert_eq!(version.as_str(), "2026-04");
        assert!(!version.is_stable());
    }

    #[test]
    fn test_rejects_malformed_versions() {
        for bad in ["", "latest", "2025", "2025-1", "2025-02", "25-01", "2025-01-01"] {
            assert!(bad.parse::<ApiVersion>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_ordering_follows_release_order() {
        assert!(ApiVersion::V2024_10 < ApiVersion::V2025_01);
        assert!(ApiVersion::latest() < ApiVersion::Unstable);
        assert!(ApiVersion::Unstable < ApiVersion::Custom("2026-01".to_string()));
        assert!(
            ApiVersion::Custom("2026-01".to_string()) < ApiVersion::Custom("2026-04".to_string())
        );
    }

    #[test]
    fn test_display_matches_path_segment() {
        for (version, raw) in STABLE {
            assert_eq!(version.to_string(), raw);
        }
        assert_eq!(ApiVersion::Unstable.to_string(), "unstable");
    }
}
