//! Filesystem-backed extension store
//!
//! Layout: one directory per installed copy under the extensions root,
//! named `<publisher.name>-<version>`, holding the package contents plus
//! a `.extman.json` metadata sidecar. System extensions live in a
//! separate read-only tree shipped with the host product.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

use extman_core::{
    error::{Error, Result},
    ExtensionKind, ExtensionManifest, GalleryExtension, InstallOptions, InstalledExtension,
};

use crate::store::ExtensionStore;

const MANIFEST_FILE: &str = "package.json";
const METADATA_FILE: &str = ".extman.json";

/// Install-time flags persisted next to the package contents
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct InstallMetadata {
    #[serde(default)]
    builtin: bool,
    #[serde(default)]
    machine_scoped: bool,
}

/// Filesystem extension store
pub struct LocalStore {
    extensions_dir: Utf8PathBuf,
    builtin_dir: Option<Utf8PathBuf>,
}

impl LocalStore {
    /// Create a store rooted at `extensions_dir`, with an optional
    /// read-only builtin tree
    pub fn new(
        extensions_dir: impl Into<Utf8PathBuf>,
        builtin_dir: Option<Utf8PathBuf>,
    ) -> Result<Self> {
        let extensions_dir = extensions_dir.into();
        std::fs::create_dir_all(&extensions_dir)?;
        Ok(Self {
            extensions_dir,
            builtin_dir,
        })
    }

    fn read_manifest(dir: &Utf8Path) -> Result<ExtensionManifest> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::invalid_manifest(format!("cannot read {}: {}", path, e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::invalid_manifest(format!("cannot parse {}: {}", path, e)))
    }

    fn file_url(dir: &Utf8Path) -> Result<Url> {
        let absolute = std::fs::canonicalize(dir.as_std_path())?;
        Url::from_file_path(&absolute)
            .map_err(|_| Error::invalid_manifest(format!("not a local path: {}", dir)))
    }

    /// Scan one extensions tree, skipping entries that fail to parse
    fn scan_dir(dir: &Utf8Path, kind: ExtensionKind) -> Result<Vec<InstalledExtension>> {
        let mut extensions = Vec::new();
        if !dir.as_std_path().exists() {
            return Ok(extensions);
        }

        for entry in std::fs::read_dir(dir.as_std_path())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let entry_dir = match Utf8PathBuf::from_path_buf(entry.path()) {
                Ok(p) => p,
                Err(p) => {
                    warn!("Skipping non-UTF8 extension directory: {}", p.display());
                    continue;
                }
            };

            let manifest = match Self::read_manifest(&entry_dir) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Skipping {}: {}", entry_dir, e);
                    continue;
                }
            };

            let metadata = match kind {
                ExtensionKind::System => InstallMetadata {
                    builtin: true,
                    machine_scoped: false,
                },
                ExtensionKind::User => std::fs::read_to_string(entry_dir.join(METADATA_FILE))
                    .ok()
                    .and_then(|content| serde_json::from_str(&content).ok())
                    .unwrap_or_default(),
            };

            let location = match Self::file_url(&entry_dir) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping {}: {}", entry_dir, e);
                    continue;
                }
            };

            extensions.push(InstalledExtension {
                manifest,
                kind,
                builtin: metadata.builtin,
                machine_scoped: metadata.machine_scoped,
                location,
            });
        }

        Ok(extensions)
    }

    fn target_dir(&self, manifest: &ExtensionManifest) -> Utf8PathBuf {
        self.extensions_dir.join(format!(
            "{}-{}",
            manifest.identifier().normalized(),
            manifest.version
        ))
    }

    fn write_installed(
        &self,
        target: &Utf8Path,
        manifest: &ExtensionManifest,
        metadata: InstallMetadata,
    ) -> Result<InstalledExtension> {
        let metadata_json = serde_json::to_string_pretty(&metadata)?;
        std::fs::write(target.join(METADATA_FILE), metadata_json)?;

        Ok(InstalledExtension {
            manifest: manifest.clone(),
            kind: ExtensionKind::User,
            builtin: metadata.builtin,
            machine_scoped: metadata.machine_scoped,
            location: Self::file_url(target)?,
        })
    }
}

/// Copy a package directory tree into the store
fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[async_trait]
impl ExtensionStore for LocalStore {
    async fn installed(&self, kind: Option<ExtensionKind>) -> Result<Vec<InstalledExtension>> {
        let mut extensions = Vec::new();

        if kind.is_none() || kind == Some(ExtensionKind::User) {
            extensions.extend(Self::scan_dir(&self.extensions_dir, ExtensionKind::User)?);
        }
        if kind.is_none() || kind == Some(ExtensionKind::System) {
            if let Some(builtin_dir) = &self.builtin_dir {
                extensions.extend(Self::scan_dir(builtin_dir, ExtensionKind::System)?);
            }
        }

        Ok(extensions)
    }

    async fn manifest(&self, package: &Utf8Path) -> Result<ExtensionManifest> {
        Self::read_manifest(package)
    }

    async fn install(&self, package: &Utf8Path) -> Result<InstalledExtension> {
        let manifest = Self::read_manifest(package)?;
        let target = self.target_dir(&manifest);

        // reinstalling the same version replaces the previous copy
        if target.as_std_path().exists() {
            std::fs::remove_dir_all(&target)?;
        }
        copy_dir(package.as_std_path(), target.as_std_path())?;
        debug!("Installed {} from {}", manifest.identifier(), package);

        self.write_installed(&target, &manifest, InstallMetadata::default())
    }

    async fn install_from_gallery(
        &self,
        extension: &GalleryExtension,
        manifest: &ExtensionManifest,
        options: &InstallOptions,
    ) -> Result<InstalledExtension> {
        let target = self.target_dir(manifest);

        if target.as_std_path().exists() {
            std::fs::remove_dir_all(&target)?;
        }
        std::fs::create_dir_all(&target)?;
        std::fs::write(
            target.join(MANIFEST_FILE),
            serde_json::to_string_pretty(manifest)?,
        )?;
        debug!(
            "Installed {}@{} from gallery",
            extension.identifier, extension.version
        );

        self.write_installed(
            &target,
            manifest,
            InstallMetadata {
                builtin: options.builtin,
                machine_scoped: options.machine_scoped,
            },
        )
    }

    async fn uninstall(&self, extension: &InstalledExtension) -> Result<()> {
        // System extensions live in the read-only product tree
        if extension.kind == ExtensionKind::System {
            return Err(Error::protected(extension.identifier().as_str()));
        }

        let path = extension
            .local_path()
            .ok_or_else(|| Error::install_failed(
                extension.identifier().as_str(),
                "storage location is not a local path",
            ))?;

        tokio::fs::remove_dir_all(&path).await?;
        debug!("Removed {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn manifest_json(publisher: &str, name: &str, version: &str) -> String {
        format!(
            r#"{{"name": "{}", "publisher": "{}", "version": "{}"}}"#,
            name, publisher, version
        )
    }

    fn make_package(root: &Utf8Path, publisher: &str, name: &str, version: &str) -> Utf8PathBuf {
        let package = root.join(format!("{}-{}-pkg", name, version));
        std::fs::create_dir_all(&package).unwrap();
        std::fs::write(
            package.join(MANIFEST_FILE),
            manifest_json(publisher, name, version),
        )
        .unwrap();
        package
    }

    fn temp_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn install_and_scan_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);
        let store = LocalStore::new(root.join("extensions"), None).unwrap();
        let package = make_package(&root, "acme", "tool", "1.0.0");

        let installed = store.install(&package).await.unwrap();
        assert_eq!(installed.manifest.identifier().as_str(), "acme.tool");
        assert_eq!(installed.kind, ExtensionKind::User);

        let all = store.installed(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].manifest.version, Version::new(1, 0, 0));
        assert!(all[0].local_path().is_some());
    }

    #[tokio::test]
    async fn manifest_errors_are_invalid_manifest_kind() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);
        let store = LocalStore::new(root.join("extensions"), None).unwrap();

        let missing = store.manifest(&root.join("nope")).await;
        assert!(matches!(missing, Err(Error::InvalidManifest { .. })));

        let bad = root.join("bad-pkg");
        std::fs::create_dir_all(&bad).unwrap();
        std::fs::write(bad.join(MANIFEST_FILE), "{not json").unwrap();
        let unparsable = store.manifest(&bad).await;
        assert!(matches!(unparsable, Err(Error::InvalidManifest { .. })));
    }

    #[tokio::test]
    async fn scan_skips_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);
        let extensions_dir = root.join("extensions");
        let store = LocalStore::new(extensions_dir.clone(), None).unwrap();

        let package = make_package(&root, "acme", "tool", "1.0.0");
        store.install(&package).await.unwrap();

        let corrupt = extensions_dir.join("broken-1.0.0");
        std::fs::create_dir_all(&corrupt).unwrap();
        std::fs::write(corrupt.join(MANIFEST_FILE), "garbage").unwrap();

        let all = store.installed(None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn file_url_requires_a_resolvable_path() {
        // scan_dir skips entries whose location cannot be resolved the
        // same way it skips a corrupt manifest
        let err = LocalStore::file_url(Utf8Path::new("/no/such/store-entry")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn gallery_install_persists_options() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);
        let store = LocalStore::new(root.join("extensions"), None).unwrap();

        let manifest: ExtensionManifest =
            serde_json::from_str(&manifest_json("acme", "pack", "2.0.0")).unwrap();
        let extension = GalleryExtension {
            identifier: manifest.identifier(),
            version: manifest.version.clone(),
        };
        let options = InstallOptions {
            builtin: true,
            machine_scoped: false,
        };

        store
            .install_from_gallery(&extension, &manifest, &options)
            .await
            .unwrap();

        let all = store.installed(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].builtin);
        assert!(!all[0].machine_scoped);
    }

    #[tokio::test]
    async fn uninstall_removes_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);
        let store = LocalStore::new(root.join("extensions"), None).unwrap();
        let package = make_package(&root, "acme", "tool", "1.0.0");

        let installed = store.install(&package).await.unwrap();
        store.uninstall(&installed).await.unwrap();

        assert!(store.installed(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn system_extensions_are_never_removed() {
        let dir = tempfile::tempdir().unwrap();
        let root = temp_root(&dir);

        let builtin_dir = root.join("builtin");
        let builtin_pkg = builtin_dir.join("core.base-1.0.0");
        std::fs::create_dir_all(&builtin_pkg).unwrap();
        std::fs::write(
            builtin_pkg.join(MANIFEST_FILE),
            manifest_json("core", "base", "1.0.0"),
        )
        .unwrap();

        let store = LocalStore::new(root.join("extensions"), Some(builtin_dir)).unwrap();
        let system = store
            .installed(Some(ExtensionKind::System))
            .await
            .unwrap()
            .remove(0);

        let result = store.uninstall(&system).await;
        assert!(matches!(result, Err(Error::Protected { .. })));
        assert_eq!(
            store.installed(Some(ExtensionKind::System)).await.unwrap().len(),
            1
        );
    }
}
