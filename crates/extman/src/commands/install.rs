//! Extension install command

use anyhow::Result;

use extman_manager::{BatchInstaller, InstallBatchOptions};

use crate::cli::InstallArgs;
use crate::output::{self, ConsoleOutput};

/// Install extensions by identifier, identifier@version, or package path
///
/// Every requested item is attempted; individual failures are reported
/// at the end as one aggregate error so a single bad reference cannot
/// sink the rest of the batch.
pub async fn run(args: InstallArgs) -> Result<()> {
    let store = super::open_store()?;
    let gallery = super::open_gallery()?;
    let localization = super::open_localization_cache()?;
    let sink = ConsoleOutput;

    let installer = BatchInstaller::new(&store, &gallery, &localization, &sink);
    let options = InstallBatchOptions {
        machine_scoped: args.machine,
        force: args.force,
    };

    let spinner = output::spinner("Installing extensions...");
    let result = installer
        .install(&args.references, &args.builtin, options)
        .await;
    spinner.finish_and_clear();

    let outcome = result?;
    if !outcome.installed.is_empty() {
        output::success(&format!(
            "Installed {} extension(s)",
            outcome.installed.len()
        ));
    }
    outcome.to_result()?;
    Ok(())
}
