//! Shared data model for extension management
//!
//! The identifier type centralizes the case-insensitive comparison rules
//! used everywhere: planner, resolver, store and gallery all key their
//! lookups on [`ExtensionIdentifier::normalized`] so the casing rules can
//! never diverge between components.

use semver::Version;
use serde::{Deserialize, Serialize};
use url::Url;

/// Category name that triggers a localization cache refresh on install/uninstall
pub const LANGUAGE_PACK_CATEGORY: &str = "Language Packs";

/// Identifiers adopted after the publisher namespace split; lookups on
/// the old form are transparently redirected to the current one.
const RENAMED_IDENTIFIERS: &[(&str, &str)] = &[
    ("extman.language-packs", "extman-core.language-packs"),
    ("extman.theme-defaults", "extman-core.theme-defaults"),
];

/// A `publisher.name` pair naming an extension's logical lineage.
///
/// The original casing is preserved for display; equality and hashing
/// are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionIdentifier(String);

impl ExtensionIdentifier {
    /// Create an identifier from a raw string, canonicalizing known
    /// legacy forms to their current names
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let adopted = RENAMED_IDENTIFIERS
            .iter()
            .find(|(old, _)| old.eq_ignore_ascii_case(&raw))
            .map(|(_, new)| (*new).to_string());
        Self(adopted.unwrap_or(raw))
    }

    /// Create an identifier from its publisher and name parts
    pub fn from_parts(publisher: &str, name: &str) -> Self {
        Self::new(format!("{}.{}", publisher, name))
    }

    /// The canonical lowercase key used for map insertion and lookup
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// The identifier as entered (original casing)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ExtensionIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ExtensionIdentifier {}

impl std::hash::Hash for ExtensionIdentifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl std::fmt::Display for ExtensionIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExtensionIdentifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Extension manifest (package.json of a package)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionManifest {
    /// Extension name (without publisher)
    pub name: String,

    /// Publisher name
    pub publisher: String,

    /// Semantic version
    pub version: Version,

    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Gallery categories (e.g. "Themes", "Language Packs")
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ExtensionManifest {
    /// The logical identifier of this manifest
    pub fn identifier(&self) -> ExtensionIdentifier {
        ExtensionIdentifier::from_parts(&self.publisher, &self.name)
    }

    /// Whether this extension is a language pack
    pub fn is_language_pack(&self) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(LANGUAGE_PACK_CATEGORY))
    }
}

/// Where an installed extension came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    /// Installed by explicit user action
    User,
    /// Shipped with the base product; never uninstallable
    System,
}

/// An extension present in the local store
#[derive(Debug, Clone)]
pub struct InstalledExtension {
    /// Parsed manifest of the installed copy
    pub manifest: ExtensionManifest,

    /// User or System
    pub kind: ExtensionKind,

    /// Marked builtin at install time (protected unless --force)
    pub builtin: bool,

    /// Installed with machine scope
    pub machine_scoped: bool,

    /// Storage location; a `file://` URL for locally stored extensions
    pub location: Url,
}

impl InstalledExtension {
    /// The logical identifier of this installed extension
    pub fn identifier(&self) -> ExtensionIdentifier {
        self.manifest.identifier()
    }

    /// Whether this and `other` name the same logical extension
    pub fn is_same_extension(&self, identifier: &ExtensionIdentifier) -> bool {
        self.identifier() == *identifier
    }

    /// The local filesystem path of this extension, if its storage
    /// location is a local path
    pub fn local_path(&self) -> Option<camino::Utf8PathBuf> {
        if self.location.scheme() != "file" {
            return None;
        }
        self.location
            .to_file_path()
            .ok()
            .and_then(|p| camino::Utf8PathBuf::from_path_buf(p).ok())
    }
}

/// A remote candidate returned by the gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryExtension {
    /// Logical identifier
    pub identifier: ExtensionIdentifier,

    /// Version the gallery resolved for this candidate
    pub version: Version,
}

/// Per-request install options, immutable for the duration of a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Install as a builtin extension
    pub builtin: bool,

    /// Persist with machine scope rather than user scope
    pub machine_scoped: bool,
}

/// One planned install, ready for gallery resolution
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Logical identifier to install
    pub identifier: ExtensionIdentifier,

    /// Pinned version, if the reference carried one
    pub version: Option<Version>,

    /// Options resolved by the planner
    pub options: InstallOptions,

    /// Whether --force was set for this request
    pub force: bool,
}

impl InstallRequest {
    /// Deduplication key: requests agreeing on identifier, force flag
    /// and pinned version are no-op duplicates and planned only once
    pub fn dedup_key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.identifier.normalized(),
            self.force,
            self.version
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default()
        )
    }
}

/// Aggregated result of one install batch
///
/// Appends come from independently scheduled tasks, so the order of
/// both sequences is unspecified; consumers must treat them as sets.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Manifests of everything successfully installed
    pub installed: Vec<ExtensionManifest>,

    /// Identifiers (or package locations) that failed
    pub failed: Vec<String>,
}

impl BatchOutcome {
    /// Whether any installed manifest is a language pack
    pub fn has_language_pack(&self) -> bool {
        self.installed.iter().any(|m| m.is_language_pack())
    }

    /// Fold another outcome into this one
    pub fn merge(&mut self, other: BatchOutcome) {
        self.installed.extend(other.installed);
        self.failed.extend(other.failed);
    }

    /// The aggregate error for this batch, if any item failed
    ///
    /// Kept separate from the outcome itself so successes remain
    /// visible to the caller even when the batch as a whole fails.
    pub fn to_result(&self) -> crate::error::Result<()> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::aggregate_install(&self.failed))
        }
    }
}
