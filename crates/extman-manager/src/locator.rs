//! Locating installed extensions on disk

use camino::Utf8PathBuf;

use extman_core::{error::Result, ExtensionIdentifier};
use extman_store::ExtensionStore;

/// Find the local filesystem path of each requested identifier
///
/// Identifiers that match nothing installed, and installed copies whose
/// storage location is not a local path, are silently omitted.
pub async fn locate(
    store: &dyn ExtensionStore,
    identifiers: &[String],
) -> Result<Vec<(ExtensionIdentifier, Utf8PathBuf)>> {
    let installed = store.installed(None).await?;

    let mut located = Vec::new();
    for raw in identifiers {
        let identifier = ExtensionIdentifier::new(raw.as_str());
        for extension in installed.iter().filter(|e| e.is_same_extension(&identifier)) {
            if let Some(path) = extension.local_path() {
                located.push((extension.identifier(), path));
            }
        }
    }

    Ok(located)
}
