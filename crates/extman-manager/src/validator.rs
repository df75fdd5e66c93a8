//! Downgrade protection
//!
//! The fatal precondition of this check, a missing or unparsable
//! manifest, surfaces earlier as `Error::InvalidManifest` from the
//! store's manifest read; by the time a manifest reaches this function
//! it is known to be well formed.

use extman_core::{ExtensionManifest, InstalledExtension, OutputSink};

/// Whether installing `manifest` is allowed against the installed set
///
/// Denies when a strictly newer version of the same logical extension
/// is already installed and `force` is not set. Deny is advisory, not
/// an error: the caller logs and skips.
pub fn validate_downgrade(
    manifest: &ExtensionManifest,
    installed: &[InstalledExtension],
    force: bool,
    output: &dyn OutputSink,
) -> bool {
    if force {
        return true;
    }

    let identifier = manifest.identifier();
    let newer = installed
        .iter()
        .filter(|e| e.is_same_extension(&identifier))
        .find(|e| e.manifest.version > manifest.version);

    match newer {
        Some(existing) => {
            output.info(&format!(
                "Skipping installing extension '{}' v{}: newer version {} is already installed. Use '--force' option to downgrade.",
                identifier, manifest.version, existing.manifest.version
            ));
            false
        }
        None => true,
    }
}
