//! Localization cache trigger
//!
//! Installing or removing a language pack invalidates the host's
//! localized-string cache. The store only triggers the rebuild; the
//! rebuild itself belongs to the host application watching the marker.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use extman_core::error::Result;

/// Marker file the host application watches for cache invalidation
const REFRESH_MARKER: &str = "language-packs.refresh";

/// Localization cache collaborator
#[async_trait]
pub trait LocalizationCache: Send + Sync {
    /// Invalidate the cache so localized strings are rebuilt
    async fn refresh(&self) -> Result<()>;
}

/// File-backed localization cache trigger
pub struct FileLocalizationCache {
    cache_dir: Utf8PathBuf,
}

impl FileLocalizationCache {
    pub fn new(cache_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Path of the refresh marker file
    pub fn marker_path(&self) -> Utf8PathBuf {
        self.cache_dir.join(REFRESH_MARKER)
    }
}

#[async_trait]
impl LocalizationCache for FileLocalizationCache {
    async fn refresh(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        tokio::fs::write(self.marker_path(), stamp.to_string()).await?;

        debug!("Localization cache refresh requested at {}", stamp);
        Ok(())
    }
}
