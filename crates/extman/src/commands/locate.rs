//! Extension locate command

use anyhow::Result;

use extman_manager::locate;

use crate::cli::LocateArgs;

/// Print the local path of each requested installed extension
///
/// Identifiers with no installed local copy are silently omitted.
pub async fn run(args: LocateArgs) -> Result<()> {
    let store = super::open_store()?;

    for (_, path) in locate(&store, &args.identifiers).await? {
        println!("{}", path);
    }
    Ok(())
}
