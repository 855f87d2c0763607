//! Data models for the HWMI package.
//!
//! - [`PackageConfig`]: persisted settings loaded from `HWMI Config.yaml`
//!   ([`ImporterConfig`] and the [`MigotoConfig`] feature toggles)
//! - [`HWMI_FEATURES`]: the static table of `main.ini` writes each feature
//!   toggle selects

pub mod config;
pub mod features;

pub use config::{ImporterConfig, InjectMode, MigotoConfig, PackageConfig};
pub use features::{ConfigFeature, FeatureStates, HWMI_FEATURES, IniValue, IniWrite};
