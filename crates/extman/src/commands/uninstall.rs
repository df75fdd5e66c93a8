//! Extension uninstall command

use anyhow::Result;

use extman_manager::BatchUninstaller;

use crate::cli::UninstallArgs;
use crate::output::ConsoleOutput;

/// Uninstall extensions by identifier or package path
///
/// References are processed in order; an unknown extension aborts the
/// batch, and protected (system or builtin) extensions stop it early.
pub async fn run(args: UninstallArgs) -> Result<()> {
    let store = super::open_store()?;
    let localization = super::open_localization_cache()?;
    let sink = ConsoleOutput;

    let uninstaller = BatchUninstaller::new(&store, &localization, &sink);
    uninstaller.uninstall(&args.references, args.force).await?;
    Ok(())
}
