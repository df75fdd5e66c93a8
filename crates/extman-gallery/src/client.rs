//! Gallery client trait and HTTP implementation
//!
//! The trait is the seam between batch planning and the remote catalog;
//! the HTTP implementation talks JSON to the gallery service configured
//! via `EXTMAN_GALLERY_URL`.

use async_trait::async_trait;
use semver::Version;
use std::time::Duration;
use tracing::debug;
use url::Url;

use extman_core::{
    error::{Error, Result},
    ExtensionIdentifier, ExtensionManifest, GalleryExtension,
};

/// Default gallery service endpoint
pub const DEFAULT_GALLERY_URL: &str = "https://gallery.extman.dev";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote extension catalog
#[async_trait]
pub trait GalleryClient: Send + Sync {
    /// Look up the latest compatible version of each identifier in one
    /// round trip; identifiers without a match are simply absent from
    /// the result
    async fn extensions(
        &self,
        identifiers: &[ExtensionIdentifier],
    ) -> Result<Vec<GalleryExtension>>;

    /// Look up one identifier, optionally pinned to a version; `None`
    /// when the gallery has no compatible match
    async fn compatible_extension(
        &self,
        identifier: &ExtensionIdentifier,
        version: Option<&Version>,
    ) -> Result<Option<GalleryExtension>>;

    /// Fetch the manifest of a gallery candidate
    async fn manifest(&self, extension: &GalleryExtension) -> Result<ExtensionManifest>;
}

/// HTTP gallery client
pub struct HttpGalleryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpGalleryClient {
    /// Create a client against the given gallery base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::gallery(format!("invalid gallery URL '{}': {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::gallery(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// Create a client from the EXTMAN_GALLERY_URL environment variable,
    /// falling back to the default gallery
    pub fn from_env() -> Result<Self> {
        let base = std::env::var("EXTMAN_GALLERY_URL")
            .unwrap_or_else(|_| DEFAULT_GALLERY_URL.to_string());
        Self::new(&base)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::gallery("gallery URL cannot be a base"))?
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("Gallery request: {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::gallery(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::gallery(format!(
                "gallery returned HTTP {} for {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::gallery(format!("invalid gallery response from {}: {}", url, e)))
    }
}

#[async_trait]
impl GalleryClient for HttpGalleryClient {
    async fn extensions(
        &self,
        identifiers: &[ExtensionIdentifier],
    ) -> Result<Vec<GalleryExtension>> {
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let ids = identifiers
            .iter()
            .map(|id| id.normalized())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.endpoint(&["api", "extensions"])?;
        url.query_pairs_mut().append_pair("ids", &ids);

        self.get_json(url).await
    }

    async fn compatible_extension(
        &self,
        identifier: &ExtensionIdentifier,
        version: Option<&Version>,
    ) -> Result<Option<GalleryExtension>> {
        let mut url = self.endpoint(&["api", "extensions", &identifier.normalized()])?;
        if let Some(version) = version {
            url.query_pairs_mut()
                .append_pair("version", &version.to_string());
        }

        debug!("Gallery lookup: {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::gallery(format!("request to {} failed: {}", url, e)))?;

        // the gallery answers 404 for "no compatible match"
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::gallery(format!(
                "gallery returned HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let extension = response
            .json()
            .await
            .map_err(|e| Error::gallery(format!("invalid gallery response from {}: {}", url, e)))?;
        Ok(Some(extension))
    }

    async fn manifest(&self, extension: &GalleryExtension) -> Result<ExtensionManifest> {
        let url = self.endpoint(&[
            "api",
            "extensions",
            &extension.identifier.normalized(),
            &extension.version.to_string(),
            "manifest",
        ])?;
        self.get_json(url).await
    }
}
