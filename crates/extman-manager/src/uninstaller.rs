//! Batch uninstallation
//!
//! Strictly sequential: each reference resolves against a fresh read of
//! the installed set, because earlier removals in the same batch change
//! what later references may match. A protection hit (system or builtin
//! extension) short-circuits the remaining references on purpose.

use tracing::{debug, warn};

use extman_core::{
    error::{Error, Result},
    ExtensionIdentifier, ExtensionKind, ExtensionManifest, ExtensionReference, OutputSink,
};
use extman_store::{ExtensionStore, LocalizationCache};

use crate::planner::is_package_path;

/// Orchestrates one uninstall batch against the store
pub struct BatchUninstaller<'a> {
    store: &'a dyn ExtensionStore,
    localization: &'a dyn LocalizationCache,
    output: &'a dyn OutputSink,
}

impl<'a> BatchUninstaller<'a> {
    pub fn new(
        store: &'a dyn ExtensionStore,
        localization: &'a dyn LocalizationCache,
        output: &'a dyn OutputSink,
    ) -> Self {
        Self {
            store,
            localization,
            output,
        }
    }

    /// Uninstall a batch of references
    ///
    /// A reference that matches nothing installed is fatal and aborts
    /// the batch immediately; a failing removal is recorded and the
    /// batch continues, surfacing one aggregate error at the end. The
    /// localization cache is refreshed when any removed extension was
    /// a language pack, also when the batch was short-circuited by a
    /// protection hit.
    pub async fn uninstall(&self, references: &[String], force: bool) -> Result<()> {
        let mut removed: Vec<ExtensionManifest> = Vec::new();
        let mut failed: Vec<String> = Vec::new();
        let result = self.process(references, force, &mut removed, &mut failed).await;

        if removed.iter().any(|m| m.is_language_pack()) {
            debug!("Language pack removed, refreshing localization cache");
            if let Err(e) = self.localization.refresh().await {
                warn!("Localization cache refresh failed: {}", e);
            }
        }

        result?;
        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::aggregate_uninstall(&failed))
        }
    }

    async fn process(
        &self,
        references: &[String],
        force: bool,
        removed: &mut Vec<ExtensionManifest>,
        failed: &mut Vec<String>,
    ) -> Result<()> {
        for reference in references {
            let identifier = self.resolve_identifier(reference).await?;

            // fresh read per reference: earlier removals must be visible
            let installed = self.store.installed(None).await?;
            let matching: Vec<_> = installed
                .into_iter()
                .filter(|e| e.is_same_extension(&identifier))
                .collect();

            let Some(first) = matching.first() else {
                let error = Error::not_installed(identifier.as_str());
                self.output.error(&error.to_string());
                return Err(error);
            };

            if first.kind == ExtensionKind::System {
                self.output.info(&format!(
                    "Extension '{}' is part of the product and cannot be uninstalled.",
                    identifier
                ));
                return Ok(());
            }
            if first.builtin && !force {
                self.output.info(&format!(
                    "Extension '{}' is marked as a builtin extension. Use '--force' option to uninstall it.",
                    identifier
                ));
                return Ok(());
            }

            // an identifier may have several installed copies (e.g.
            // differing scopes); remove them all
            let mut reference_failed = false;
            for extension in &matching {
                match self.store.uninstall(extension).await {
                    Ok(()) => {
                        self.output.info(&format!(
                            "Extension '{}' v{} was successfully uninstalled.",
                            identifier, extension.manifest.version
                        ));
                        removed.push(extension.manifest.clone());
                    }
                    Err(e) if e.is_cancelled() => {
                        self.output.info(&format!(
                            "Cancelled uninstalling extension '{}'.",
                            identifier
                        ));
                    }
                    Err(e) => {
                        self.output.error(&format!(
                            "Failed uninstalling extension '{}': {}",
                            identifier, e
                        ));
                        reference_failed = true;
                    }
                }
            }
            if reference_failed {
                failed.push(identifier.normalized());
            }
        }

        Ok(())
    }

    /// Resolve a raw reference to the identifier to uninstall; package
    /// paths go through the store's manifest read
    async fn resolve_identifier(&self, reference: &str) -> Result<ExtensionIdentifier> {
        if is_package_path(reference) {
            let manifest = self
                .store
                .manifest(camino::Utf8Path::new(reference))
                .await?;
            return Ok(manifest.identifier());
        }
        Ok(ExtensionReference::parse(reference).identifier)
    }
}
