//! Local extension store for extman
//!
//! This crate handles:
//! - The `ExtensionStore` trait consumed by batch install/uninstall
//! - A filesystem-backed store (directory per installed extension)
//! - The `LocalizationCache` trait and its marker-file implementation

pub mod local;
pub mod localization;
pub mod store;

pub use local::LocalStore;
pub use localization::{FileLocalizationCache, LocalizationCache};
pub use store::ExtensionStore;
