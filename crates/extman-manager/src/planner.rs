//! Install planning
//!
//! A single synchronous pass over the requested references against the
//! installed snapshot taken at the start of the batch. Concurrent
//! installs within the batch never see each other's effects here; by the
//! time the pools run, the plan is fixed.

use std::collections::HashSet;

use camino::Utf8PathBuf;
use tracing::debug;

use extman_core::{
    ExtensionReference, InstallOptions, InstallRequest, InstalledExtension, OutputSink,
};

/// Planned work for one install batch
#[derive(Debug, Default)]
pub struct InstallPlan {
    /// Local package paths, installed by the package pool
    pub package_paths: Vec<Utf8PathBuf>,

    /// Requests to resolve against the gallery
    pub requests: Vec<InstallRequest>,
}

/// Whether a raw reference names a local package rather than a
/// gallery identifier
pub fn is_package_path(reference: &str) -> bool {
    reference.contains(std::path::MAIN_SEPARATOR)
        || reference.contains('/')
        || reference.starts_with('.')
        || reference.starts_with('~')
}

/// Plan an install batch
///
/// Per reference, decides skip-already-satisfied, skip-needs-force, or
/// proceed. Duplicates agreeing on identifier, force flag and pinned
/// version are planned once. Builtin references always install with
/// `builtin = true` and user scope.
pub fn plan_installs(
    references: &[String],
    builtin_references: &[String],
    machine_scoped: bool,
    force: bool,
    installed: &[InstalledExtension],
    output: &dyn OutputSink,
) -> InstallPlan {
    let mut plan = InstallPlan::default();
    let mut planned: HashSet<String> = HashSet::new();

    let user_options = InstallOptions {
        builtin: false,
        machine_scoped,
    };
    let builtin_options = InstallOptions {
        builtin: true,
        machine_scoped: false,
    };

    for reference in references {
        if is_package_path(reference) {
            plan.package_paths.push(Utf8PathBuf::from(reference));
            continue;
        }
        push_request(
            &mut plan,
            &mut planned,
            reference,
            user_options,
            force,
            installed,
            output,
        );
    }

    for reference in builtin_references {
        push_request(
            &mut plan,
            &mut planned,
            reference,
            builtin_options,
            force,
            installed,
            output,
        );
    }

    debug!(
        "Planned {} gallery request(s), {} package path(s)",
        plan.requests.len(),
        plan.package_paths.len()
    );
    plan
}

fn push_request(
    plan: &mut InstallPlan,
    planned: &mut HashSet<String>,
    reference: &str,
    options: InstallOptions,
    force: bool,
    installed: &[InstalledExtension],
    output: &dyn OutputSink,
) {
    let reference = ExtensionReference::parse(reference);
    let existing = installed
        .iter()
        .find(|e| e.is_same_extension(&reference.identifier));

    if let Some(existing) = existing {
        match &reference.version {
            // no version requested: staying put needs neither a gallery
            // round trip nor an install, unless forced
            None if !force => {
                output.info(&format!(
                    "Extension '{}' v{} is already installed. Use '--force' option to update to latest version or provide '@<version>' to install a specific version, for example: '{}@1.2.3'.",
                    reference.identifier, existing.manifest.version, reference.identifier
                ));
                return;
            }
            // the exact installed version: satisfied regardless of force
            Some(version) if *version == existing.manifest.version => {
                output.info(&format!(
                    "Extension '{}' v{} is already installed.",
                    reference.identifier, version
                ));
                return;
            }
            _ => {}
        }
    }

    let request = InstallRequest {
        identifier: reference.identifier,
        version: reference.version,
        options,
        force,
    };
    if planned.insert(request.dedup_key()) {
        plan.requests.push(request);
    }
}
