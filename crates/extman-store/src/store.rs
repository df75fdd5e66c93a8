//! Extension store trait definition

use async_trait::async_trait;
use camino::Utf8Path;

use extman_core::{
    error::Result, ExtensionKind, ExtensionManifest, GalleryExtension, InstallOptions,
    InstalledExtension,
};

/// The local extension store
///
/// Batch operations treat the store as the single authority over what
/// is installed; they snapshot `installed()` once per install batch and
/// re-read it per reference during uninstall.
#[async_trait]
pub trait ExtensionStore: Send + Sync {
    /// All installed extensions, optionally filtered by kind
    async fn installed(&self, kind: Option<ExtensionKind>) -> Result<Vec<InstalledExtension>>;

    /// Read the manifest of a local extension package
    ///
    /// A missing or unparsable manifest is an error of its own kind
    /// (`InvalidManifest`); callers treat it as fatal rather than a
    /// planning decision.
    async fn manifest(&self, package: &Utf8Path) -> Result<ExtensionManifest>;

    /// Install a local extension package
    async fn install(&self, package: &Utf8Path) -> Result<InstalledExtension>;

    /// Install a resolved gallery candidate
    async fn install_from_gallery(
        &self,
        extension: &GalleryExtension,
        manifest: &ExtensionManifest,
        options: &InstallOptions,
    ) -> Result<InstalledExtension>;

    /// Remove one installed copy
    async fn uninstall(&self, extension: &InstalledExtension) -> Result<()>;
}
