//! Command implementations

pub mod install;
pub mod list;
pub mod locate;
pub mod uninstall;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use tracing::debug;

use crate::utils::{get_builtin_dir, get_cache_dir, get_extensions_dir};
use extman_gallery::HttpGalleryClient;
use extman_store::{FileLocalizationCache, LocalStore};

/// Open the local extension store under ~/.extman
pub(crate) fn open_store() -> Result<LocalStore> {
    let extensions_dir = utf8(get_extensions_dir()?)?;
    let builtin_dir = match get_builtin_dir() {
        Some(dir) => Some(utf8(dir)?),
        None => None,
    };
    debug!("Using extension store at {}", extensions_dir);
    LocalStore::new(extensions_dir, builtin_dir).context("Failed to open extension store")
}

/// Build the gallery client from the environment
pub(crate) fn open_gallery() -> Result<HttpGalleryClient> {
    HttpGalleryClient::from_env().context("Failed to configure gallery client")
}

/// Build the localization cache trigger
pub(crate) fn open_localization_cache() -> Result<FileLocalizationCache> {
    Ok(FileLocalizationCache::new(utf8(get_cache_dir()?)?))
}

fn utf8(path: std::path::PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|p| anyhow::anyhow!("Non-UTF8 path: {}", p.display()))
}
