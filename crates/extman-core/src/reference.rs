//! Extension reference parsing
//!
//! A reference is `publisher.name` with an optional `@X.Y.Z[-prerelease]`
//! suffix pinning a version. Parsing is a pure function and never fails:
//! a suffix that is not version-shaped is kept as part of the identifier.

use semver::Version;

use crate::types::ExtensionIdentifier;

/// A parsed extension reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionReference {
    /// Logical identifier
    pub identifier: ExtensionIdentifier,

    /// Pinned version, if the reference carried a valid one
    pub version: Option<Version>,
}

impl ExtensionReference {
    /// Parse a raw reference string
    ///
    /// Splits at the last `@`; the suffix pins a version only when it
    /// parses as a semantic version. Malformed input degrades to an
    /// identifier with no version.
    pub fn parse(raw: &str) -> Self {
        if let Some((identifier, suffix)) = raw.rsplit_once('@') {
            if !identifier.is_empty() {
                if let Ok(version) = Version::parse(suffix) {
                    return Self {
                        identifier: ExtensionIdentifier::new(identifier),
                        version: Some(version),
                    };
                }
            }
        }
        Self {
            identifier: ExtensionIdentifier::new(raw),
            version: None,
        }
    }
}

impl std::fmt::Display for ExtensionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.identifier, version),
            None => write!(f, "{}", self.identifier),
        }
    }
}
