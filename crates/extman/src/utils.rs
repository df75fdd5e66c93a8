//! Utility functions shared across CLI commands

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// container setups which remap HOME keep the CLI and any shell tooling
/// pointed at the same tree.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the extman configuration directory (~/.extman)
pub fn get_extman_dir() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("EXTMAN_HOME") {
        return Ok(PathBuf::from(root));
    }
    Ok(get_home_dir()?.join(".extman"))
}

/// Get the directory holding user-installed extensions
pub fn get_extensions_dir() -> Result<PathBuf> {
    Ok(get_extman_dir()?.join("extensions"))
}

/// Get the directory holding system (builtin) extensions
///
/// EXTMAN_BUILTIN_DIR points at the read-only tree shipped with the
/// host product; without it there are simply no system extensions.
pub fn get_builtin_dir() -> Option<PathBuf> {
    std::env::var("EXTMAN_BUILTIN_DIR").ok().map(PathBuf::from)
}

/// Get the cache directory (~/.extman/cache)
pub fn get_cache_dir() -> Result<PathBuf> {
    Ok(get_extman_dir()?.join("cache"))
}
