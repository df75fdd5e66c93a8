//! Concurrent gallery resolution
//!
//! Version-less requests share one batched gallery round trip; each
//! version-pinned request gets its own lookup, run in parallel with the
//! batch and with each other. Results merge into one map keyed by the
//! normalized identifier, so the caller can detect misses by absence.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::warn;

use extman_core::{error::Result, GalleryExtension, InstallRequest};

use crate::client::GalleryClient;

/// Resolve install requests into gallery candidates
///
/// A pinned request the gallery has no compatible match for is absent
/// from the returned map rather than an error; a failed pinned lookup
/// is logged and likewise treated as absent so one bad item cannot sink
/// the batch. A failure of the shared batched lookup is fatal, since
/// every version-less request depends on it.
pub async fn resolve_gallery_extensions(
    client: &dyn GalleryClient,
    requests: &[InstallRequest],
) -> Result<HashMap<String, GalleryExtension>> {
    let (pinned, unpinned): (Vec<_>, Vec<_>) =
        requests.iter().partition(|r| r.version.is_some());

    let unpinned_ids: Vec<_> = unpinned.iter().map(|r| r.identifier.clone()).collect();
    let batched = client.extensions(&unpinned_ids);

    let pinned_lookups = pinned.iter().map(|request| async move {
        let result = client
            .compatible_extension(&request.identifier, request.version.as_ref())
            .await;
        (request, result)
    });

    let (batched, pinned_results) = futures::join!(batched, join_all(pinned_lookups));

    let mut resolved = HashMap::new();
    for extension in batched? {
        resolved.insert(extension.identifier.normalized(), extension);
    }
    for (request, result) in pinned_results {
        match result {
            Ok(Some(extension)) => {
                resolved.insert(extension.identifier.normalized(), extension);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Gallery lookup for '{}' failed: {}", request.identifier, e);
            }
        }
    }

    Ok(resolved)
}
