//! Batch installation orchestrator
//!
//! Runs two concurrent pools, local packages and gallery candidates,
//! after a single planning pass over a one-shot installed snapshot.
//! Every item is attempted; per-item failures are caught at the task
//! boundary and folded into the batch outcome, so one bad extension
//! never cancels its siblings. Cancellation reported by the store is a
//! logged no-op, not a failure.

use std::collections::HashMap;

use camino::Utf8Path;
use futures::future::join_all;
use tracing::{debug, warn};

use extman_core::{
    error::Result, BatchOutcome, ExtensionManifest, GalleryExtension, InstallRequest,
    InstalledExtension, OutputSink,
};
use extman_gallery::{resolve_gallery_extensions, GalleryClient};
use extman_store::{ExtensionStore, LocalizationCache};

use crate::planner::plan_installs;
use crate::validator::validate_downgrade;

/// Batch-level install flags
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallBatchOptions {
    /// Persist user-requested extensions with machine scope
    pub machine_scoped: bool,

    /// Update already-installed extensions and permit downgrades
    pub force: bool,
}

/// What one install task produced
enum ItemOutcome {
    Installed(ExtensionManifest),
    Failed(String),
    Skipped,
}

/// Orchestrates one install batch against the store and the gallery
pub struct BatchInstaller<'a> {
    store: &'a dyn ExtensionStore,
    gallery: &'a dyn GalleryClient,
    localization: &'a dyn LocalizationCache,
    output: &'a dyn OutputSink,
}

impl<'a> BatchInstaller<'a> {
    pub fn new(
        store: &'a dyn ExtensionStore,
        gallery: &'a dyn GalleryClient,
        localization: &'a dyn LocalizationCache,
        output: &'a dyn OutputSink,
    ) -> Self {
        Self {
            store,
            gallery,
            localization,
            output,
        }
    }

    /// Install a batch of references
    ///
    /// Returns the full outcome even when items failed; callers raise
    /// the aggregate error via [`BatchOutcome::to_result`] once they
    /// have consumed the successes. Fatal conditions (an unreadable
    /// package manifest) propagate directly.
    pub async fn install(
        &self,
        references: &[String],
        builtin_references: &[String],
        options: InstallBatchOptions,
    ) -> Result<BatchOutcome> {
        // one snapshot for the whole batch; concurrent installs do not
        // see each other's effects during planning
        let snapshot = self.store.installed(None).await?;

        let plan = plan_installs(
            references,
            builtin_references,
            options.machine_scoped,
            options.force,
            &snapshot,
            self.output,
        );

        let resolved = resolve_gallery_extensions(self.gallery, &plan.requests).await?;

        let package_pool = join_all(
            plan.package_paths
                .iter()
                .map(|path| self.install_package(path, &snapshot, options.force)),
        );
        let gallery_pool = join_all(
            plan.requests
                .iter()
                .map(|request| self.install_resolved(request, &resolved, &snapshot)),
        );
        let (package_results, gallery_results) = tokio::join!(package_pool, gallery_pool);

        let mut outcome = BatchOutcome::default();
        for result in package_results.into_iter().chain(gallery_results) {
            match result? {
                ItemOutcome::Installed(manifest) => outcome.installed.push(manifest),
                ItemOutcome::Failed(identifier) => outcome.failed.push(identifier),
                ItemOutcome::Skipped => {}
            }
        }

        if outcome.has_language_pack() {
            debug!("Language pack installed, refreshing localization cache");
            if let Err(e) = self.localization.refresh().await {
                warn!("Localization cache refresh failed: {}", e);
            }
        }

        Ok(outcome)
    }

    /// Install one local extension package
    ///
    /// An unreadable manifest is fatal and propagates; everything else
    /// is contained within this task.
    async fn install_package(
        &self,
        package: &Utf8Path,
        snapshot: &[InstalledExtension],
        force: bool,
    ) -> Result<ItemOutcome> {
        let manifest = self.store.manifest(package).await?;

        if !validate_downgrade(&manifest, snapshot, force, self.output) {
            return Ok(ItemOutcome::Skipped);
        }

        match self.store.install(package).await {
            Ok(installed) => {
                self.output.info(&format!(
                    "Extension '{}' v{} was successfully installed.",
                    installed.identifier(),
                    installed.manifest.version
                ));
                Ok(ItemOutcome::Installed(installed.manifest))
            }
            Err(e) if e.is_cancelled() => {
                self.output
                    .info(&format!("Cancelled installing extension from '{}'.", package));
                Ok(ItemOutcome::Skipped)
            }
            Err(e) => {
                self.output
                    .error(&format!("Failed installing extension from '{}': {}", package, e));
                Ok(ItemOutcome::Failed(package.to_string()))
            }
        }
    }

    /// Install one gallery-resolved candidate
    async fn install_resolved(
        &self,
        request: &InstallRequest,
        resolved: &HashMap<String, GalleryExtension>,
        snapshot: &[InstalledExtension],
    ) -> Result<ItemOutcome> {
        let identifier = &request.identifier;

        let Some(extension) = resolved.get(&identifier.normalized()) else {
            self.output.error(&format!(
                "Extension '{}' not found. Make sure you use the full extension identifier, including the publisher, for example: publisher.name.",
                identifier
            ));
            return Ok(ItemOutcome::Failed(identifier.to_string()));
        };

        let existing = snapshot.iter().find(|e| e.is_same_extension(identifier));
        if let Some(existing) = existing {
            if existing.manifest.version == extension.version {
                // neither a success nor a failure
                self.output.info(&format!(
                    "Extension '{}' v{} is already installed.",
                    identifier, extension.version
                ));
                return Ok(ItemOutcome::Skipped);
            }
            if extension.version < existing.manifest.version && !request.force {
                self.output.info(&format!(
                    "Skipping installing extension '{}' v{}: newer version {} is already installed. Use '--force' option to downgrade.",
                    identifier, extension.version, existing.manifest.version
                ));
                return Ok(ItemOutcome::Skipped);
            }
        }

        let manifest = match self.gallery.manifest(extension).await {
            Ok(manifest) => manifest,
            Err(e) => {
                self.output.error(&format!(
                    "Failed installing extension '{}': {}",
                    identifier, e
                ));
                return Ok(ItemOutcome::Failed(identifier.to_string()));
            }
        };

        match self
            .store
            .install_from_gallery(extension, &manifest, &request.options)
            .await
        {
            Ok(installed) => {
                self.output.info(&format!(
                    "Extension '{}' v{} was successfully installed.",
                    installed.identifier(),
                    installed.manifest.version
                ));
                Ok(ItemOutcome::Installed(installed.manifest))
            }
            Err(e) if e.is_cancelled() => {
                self.output
                    .info(&format!("Cancelled installing extension '{}'.", identifier));
                Ok(ItemOutcome::Skipped)
            }
            Err(e) => {
                self.output.error(&format!(
                    "Failed installing extension '{}': {}",
                    identifier, e
                ));
                Ok(ItemOutcome::Failed(identifier.to_string()))
            }
        }
    }
}
