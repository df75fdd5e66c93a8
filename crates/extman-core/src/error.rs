//! Error types for extman-core

use thiserror::Error;

/// Result type alias using extman-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for extman
///
/// Every failure mode the batch operations care about is a distinct
/// variant so callers can pattern match on the kind (e.g. treating
/// `Cancelled` as a soft no-op) instead of inspecting error text.
#[derive(Error, Debug)]
pub enum Error {
    /// Operation was cancelled by the user or the host
    #[error("Operation cancelled")]
    Cancelled,

    /// Extension not found in the gallery
    #[error("Extension '{identifier}' not found")]
    NotFound { identifier: String },

    /// The install delegate failed
    #[error("Failed to install '{identifier}': {message}")]
    InstallFailed { identifier: String, message: String },

    /// Extension is not installed
    #[error("Extension '{identifier}' is not installed. Make sure you use the full extension identifier, including the publisher, for example: publisher.name")]
    NotInstalled { identifier: String },

    /// Extension is protected from removal
    #[error("Extension '{identifier}' is protected and cannot be uninstalled")]
    Protected { identifier: String },

    /// Package manifest is missing or unreadable
    #[error("Invalid extension package: {message}")]
    InvalidManifest { message: String },

    /// Gallery request failed
    #[error("Gallery error: {message}")]
    Gallery { message: String },

    /// Aggregate failure across a batch
    #[error("Failed to {action} extensions: {identifiers}")]
    Aggregate { action: String, identifiers: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create an install failed error
    pub fn install_failed(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InstallFailed {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a not installed error
    pub fn not_installed(identifier: impl Into<String>) -> Self {
        Self::NotInstalled {
            identifier: identifier.into(),
        }
    }

    /// Create a protected error
    pub fn protected(identifier: impl Into<String>) -> Self {
        Self::Protected {
            identifier: identifier.into(),
        }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create a gallery error
    pub fn gallery(message: impl Into<String>) -> Self {
        Self::Gallery {
            message: message.into(),
        }
    }

    /// Create an aggregate error from the failed identifiers of an
    /// install batch
    pub fn aggregate_install(identifiers: &[String]) -> Self {
        Self::Aggregate {
            action: "install".to_string(),
            identifiers: identifiers.join(", "),
        }
    }

    /// Create an aggregate error from the failed identifiers of an
    /// uninstall batch
    pub fn aggregate_uninstall(identifiers: &[String]) -> Self {
        Self::Aggregate {
            action: "uninstall".to_string(),
            identifiers: identifiers.join(", "),
        }
    }

    /// Whether this error represents a cancellation rather than a genuine failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
