//! # extman-core
//!
//! Core library for the extman CLI providing:
//! - Extension identifiers and reference parsing (`publisher.name[@version]`)
//! - The shared data model (manifests, installed extensions, gallery extensions)
//! - Error taxonomy with pattern-matchable kinds (cancelled, downgrade, protected, ...)
//! - The output sink abstraction used by every user-facing operation

pub mod error;
pub mod output;
pub mod reference;
pub mod types;

pub use error::{Error, Result};
pub use output::OutputSink;
pub use reference::ExtensionReference;
pub use types::{
    BatchOutcome, ExtensionIdentifier, ExtensionKind, ExtensionManifest, GalleryExtension,
    InstallOptions, InstallRequest, InstalledExtension,
};
