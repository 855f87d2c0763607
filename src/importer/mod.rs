//! Host-facing model importer packages.
//!
//! The launcher drives every importer through [`ModelImporter`]: it asks for
//! the installed tool version, offers auto-detected game folders to the user,
//! validates the folder the user picked and, right before starting the game,
//! lets the package prepare the launch.

pub mod hwmi;

pub use hwmi::{HwmiPackage, HORIZON_WALKER_EXE, HORIZON_WALKER_KNOWN_CHILD};

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};

/// Declarative package description consumed by the launcher's package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub package_name: String,
    pub auto_load: bool,
    pub github_repo_owner: String,
    pub github_repo_name: String,
    /// Extracts `x.y.z` from a release asset name.
    pub asset_version_pattern: String,
    /// Release asset file name, `%s` is replaced with the version.
    pub asset_name_format: String,
    pub exit_after_update: bool,
    /// Install folder relative to the launcher root.
    pub installation_path: String,
    /// Packages that must be installed first.
    pub requirements: Vec<String>,
}

impl PackageMetadata {
    /// Release asset name for `version`.
    pub fn asset_name(&self, version: &str) -> String {
        self.asset_name_format.replacen("%s", version, 1)
    }
}

/// Operations the launcher calls on a model importer package.
pub trait ModelImporter: Send + Sync {
    fn metadata(&self) -> &PackageMetadata;

    /// Installed tool version as `major.minor.patch`, or an empty string when
    /// it cannot be determined.
    fn get_installed_version(&self) -> String;

    /// Candidate game folders, most trusted first, without duplicates.
    fn autodetect_game_folders(&self) -> Vec<Utf8PathBuf>;

    /// Path of the game executable inside `game_path`.
    fn validate_game_exe_path(&self, game_path: &Utf8Path) -> Result<Utf8PathBuf>;

    /// Prepare the tool's config and game settings for a launch from `game_path`.
    fn initialize_game_launch(&self, game_path: &Utf8Path) -> Result<()>;
}
