//! Batch orchestration for extman
//!
//! This crate handles:
//! - Install planning against a one-shot installed snapshot
//! - Downgrade protection for local package installs
//! - Concurrent batch installation with per-item failure isolation
//! - Sequential uninstallation with builtin/system protection
//! - Locating installed extensions on disk

pub mod installer;
pub mod list;
pub mod locator;
pub mod planner;
pub mod uninstaller;
pub mod validator;

pub use installer::{BatchInstaller, InstallBatchOptions};
pub use list::list_installed;
pub use locator::locate;
pub use planner::{is_package_path, plan_installs, InstallPlan};
pub use uninstaller::BatchUninstaller;
pub use validator::validate_downgrade;
