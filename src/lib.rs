// HWMI - Horizon Walker model importer package
//
// This is the library crate containing the package logic the launcher calls.
// The binary crate (main.rs) provides a command line front end for it.

pub mod config;
pub mod error;
pub mod events;
pub mod importer;
pub mod ini;
pub mod logging;
pub mod models;
pub mod registry;
pub mod services;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{PackageError, Result};
pub use events::{EventSink, LauncherEvent, TracingEventSink};
pub use importer::{HwmiPackage, ModelImporter, PackageMetadata};
pub use models::{InjectMode, PackageConfig};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
