//! Shared in-memory collaborator fakes for batch orchestration tests

#![allow(dead_code)]

use async_trait::async_trait;
use camino::Utf8Path;
use semver::Version;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;

use extman_core::{
    error::{Error, Result},
    ExtensionIdentifier, ExtensionKind, ExtensionManifest, GalleryExtension, InstallOptions,
    InstalledExtension,
};
use extman_gallery::GalleryClient;
use extman_store::{ExtensionStore, LocalizationCache};

pub fn manifest(id: &str, version: &str) -> ExtensionManifest {
    manifest_with_categories(id, version, &[])
}

pub fn manifest_with_categories(id: &str, version: &str, categories: &[&str]) -> ExtensionManifest {
    let (publisher, name) = id.split_once('.').expect("identifier must be qualified");
    ExtensionManifest {
        name: name.to_string(),
        publisher: publisher.to_string(),
        version: Version::parse(version).unwrap(),
        display_name: None,
        description: None,
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn installed_ext(id: &str, version: &str) -> InstalledExtension {
    installed_from(manifest(id, version), ExtensionKind::User, false)
}

pub fn installed_from(
    manifest: ExtensionManifest,
    kind: ExtensionKind,
    builtin: bool,
) -> InstalledExtension {
    let location = Url::parse(&format!(
        "file:///store/{}-{}",
        manifest.identifier().normalized(),
        manifest.version
    ))
    .unwrap();
    InstalledExtension {
        manifest,
        kind,
        builtin,
        machine_scoped: false,
        location,
    }
}

/// In-memory extension store with scriptable failure behavior
#[derive(Default)]
pub struct MemoryStore {
    installed: Mutex<Vec<InstalledExtension>>,
    packages: HashMap<String, ExtensionManifest>,
    fail_install: HashSet<String>,
    cancel_install: HashSet<String>,
    fail_uninstall: HashSet<String>,
    pub install_calls: Mutex<Vec<String>>,
    pub uninstall_calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_installed(self, extension: InstalledExtension) -> Self {
        self.installed.lock().unwrap().push(extension);
        self
    }

    /// Register a local package at a fake path
    pub fn with_package(mut self, path: &str, manifest: ExtensionManifest) -> Self {
        self.packages.insert(path.to_string(), manifest);
        self
    }

    /// Make installs of this identifier (or package path) fail
    pub fn failing(mut self, key: &str) -> Self {
        self.fail_install.insert(key.to_lowercase());
        self
    }

    /// Make installs of this identifier report cancellation
    pub fn cancelling(mut self, key: &str) -> Self {
        self.cancel_install.insert(key.to_lowercase());
        self
    }

    /// Make uninstalls of this identifier fail
    pub fn failing_uninstall(mut self, key: &str) -> Self {
        self.fail_uninstall.insert(key.to_lowercase());
        self
    }

    pub fn install_count(&self) -> usize {
        self.install_calls.lock().unwrap().len()
    }

    pub fn uninstall_count(&self) -> usize {
        self.uninstall_calls.lock().unwrap().len()
    }

    pub fn currently_installed(&self) -> Vec<String> {
        self.installed
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.identifier().normalized())
            .collect()
    }

    fn check_behavior(&self, key: &str) -> Result<()> {
        let key = key.to_lowercase();
        if self.cancel_install.contains(&key) {
            return Err(Error::Cancelled);
        }
        if self.fail_install.contains(&key) {
            return Err(Error::install_failed(key, "disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExtensionStore for MemoryStore {
    async fn installed(&self, kind: Option<ExtensionKind>) -> Result<Vec<InstalledExtension>> {
        Ok(self
            .installed
            .lock()
            .unwrap()
            .iter()
            .filter(|e| kind.map(|k| e.kind == k).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn manifest(&self, package: &Utf8Path) -> Result<ExtensionManifest> {
        self.packages
            .get(package.as_str())
            .cloned()
            .ok_or_else(|| Error::invalid_manifest(format!("no package at {}", package)))
    }

    async fn install(&self, package: &Utf8Path) -> Result<InstalledExtension> {
        self.install_calls
            .lock()
            .unwrap()
            .push(package.to_string());
        self.check_behavior(package.as_str())?;

        let manifest = self.manifest(package).await?;
        let extension = installed_from(manifest, ExtensionKind::User, false);
        self.installed.lock().unwrap().push(extension.clone());
        Ok(extension)
    }

    async fn install_from_gallery(
        &self,
        extension: &GalleryExtension,
        manifest: &ExtensionManifest,
        options: &InstallOptions,
    ) -> Result<InstalledExtension> {
        let key = extension.identifier.normalized();
        self.install_calls.lock().unwrap().push(key.clone());
        self.check_behavior(&key)?;

        let mut installed = installed_from(manifest.clone(), ExtensionKind::User, options.builtin);
        installed.machine_scoped = options.machine_scoped;
        self.installed.lock().unwrap().push(installed.clone());
        Ok(installed)
    }

    async fn uninstall(&self, extension: &InstalledExtension) -> Result<()> {
        let key = extension.identifier().normalized();
        self.uninstall_calls.lock().unwrap().push(key.clone());
        if self.fail_uninstall.contains(&key) {
            return Err(Error::install_failed(key, "directory busy"));
        }

        self.installed.lock().unwrap().retain(|e| {
            !(e.identifier() == extension.identifier()
                && e.manifest.version == extension.manifest.version)
        });
        Ok(())
    }
}

/// In-memory gallery
#[derive(Default)]
pub struct MemoryGallery {
    available: Vec<(GalleryExtension, ExtensionManifest)>,
}

impl MemoryGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, manifest: ExtensionManifest) -> Self {
        let extension = GalleryExtension {
            identifier: manifest.identifier(),
            version: manifest.version.clone(),
        };
        self.available.push((extension, manifest));
        self
    }
}

#[async_trait]
impl GalleryClient for MemoryGallery {
    async fn extensions(
        &self,
        identifiers: &[ExtensionIdentifier],
    ) -> Result<Vec<GalleryExtension>> {
        Ok(self
            .available
            .iter()
            .filter(|(e, _)| identifiers.contains(&e.identifier))
            .map(|(e, _)| e.clone())
            .collect())
    }

    async fn compatible_extension(
        &self,
        identifier: &ExtensionIdentifier,
        version: Option<&Version>,
    ) -> Result<Option<GalleryExtension>> {
        Ok(self
            .available
            .iter()
            .find(|(e, _)| {
                e.identifier == *identifier
                    && version.map(|v| e.version == *v).unwrap_or(true)
            })
            .map(|(e, _)| e.clone()))
    }

    async fn manifest(&self, extension: &GalleryExtension) -> Result<ExtensionManifest> {
        self.available
            .iter()
            .find(|(e, _)| {
                e.identifier == extension.identifier && e.version == extension.version
            })
            .map(|(_, m)| m.clone())
            .ok_or_else(|| Error::gallery("manifest not available"))
    }
}

/// Localization cache that only counts refreshes
#[derive(Default)]
pub struct CountingCache {
    refreshes: Mutex<usize>,
}

impl CountingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_count(&self) -> usize {
        *self.refreshes.lock().unwrap()
    }
}

#[async_trait]
impl LocalizationCache for CountingCache {
    async fn refresh(&self) -> Result<()> {
        *self.refreshes.lock().unwrap() += 1;
        Ok(())
    }
}

pub fn refs(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
