//! Gallery access for extman
//!
//! This crate handles:
//! - The `GalleryClient` trait consumed by batch install planning
//! - An HTTP implementation against the configured gallery service
//! - Concurrent resolution of install requests into gallery candidates

pub mod client;
pub mod resolver;

pub use client::{GalleryClient, HttpGalleryClient};
pub use resolver::resolve_gallery_extensions;
