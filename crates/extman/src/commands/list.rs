//! Extension list command

use anyhow::Result;

use extman_manager::list_installed;
use extman_store::ExtensionStore;

use crate::cli::ListArgs;

/// List installed extensions, one identifier per line
pub async fn run(args: ListArgs) -> Result<()> {
    let store = super::open_store()?;
    let installed = store.installed(None).await?;

    for line in list_installed(&installed, args.category.as_deref(), args.show_versions) {
        println!("{}", line);
    }
    Ok(())
}
