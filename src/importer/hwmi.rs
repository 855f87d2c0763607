//! Horizon Walker model importer (HWMI) package.

use super::{ModelImporter, PackageMetadata};
use crate::error::{PackageError, Result};
use crate::events::{EventSink, LauncherEvent, TracingEventSink};
use crate::models::{HWMI_FEATURES, InjectMode, PackageConfig};
use crate::registry::{RegistryStore, system_registry};
use crate::services::{
    EvidenceSource, LaunchOverlay, OverlayOutcome, PatchOutcome, PathDiscovery, ToolVersion,
    read_version, unlock_fps,
};
use crate::storage::{FileStore, OsFileStore};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::Arc;

pub const HORIZON_WALKER_EXE: &str = "HorizonWalker.exe";
pub const HORIZON_WALKER_KNOWN_CHILD: &str = "HorizonWalker_Data";

/// Unity player logs, relative to the per-user `AppData` folder.
const LOG_DIR: [&str; 3] = ["LocalLow", "Gentlemaniac", "Horizon Walker"];

pub(crate) fn hwmi_metadata() -> PackageMetadata {
    PackageMetadata {
        package_name: "HWMI".to_string(),
        auto_load: false,
        github_repo_owner: "SpectrumQT".to_string(),
        github_repo_name: "HWMI-Package".to_string(),
        asset_version_pattern: r".*(\d\.\d\.\d).*".to_string(),
        asset_name_format: "HWMI-TEST-PACKAGE-v%s.zip".to_string(),
        exit_after_update: false,
        installation_path: "HWMI/".to_string(),
        requirements: vec!["XXMI".to_string()],
    }
}

/// Path evidence patterns for Horizon Walker.
struct EvidencePatterns {
    /// Any drive path mentioning the game by name.
    common: Regex,
    /// `"installPath":"D:\\Games\\Horizon Walker Games"` in launcher manifests.
    install_path: Regex,
    /// Unity plugin and subsystem paths in `Player.log`.
    player_log: Regex,
    /// Embedded browser cache paths in `output_log.txt`.
    output_log: Regex,
}

impl EvidencePatterns {
    fn new() -> Self {
        Self {
            common: Regex::new(r#"([a-zA-Z]:[^:"']*Horizon[^:"']*Walker[^:"']*)"#)
                .expect("Invalid common path regex"),
            install_path: Regex::new(r#""(?:installPath|persistentInstallPath)":"([a-zA-Z]:[^:^"]*)""#)
                .expect("Invalid install path regex"),
            player_log: Regex::new(r#"([a-zA-Z]:[^:"']*)(?:Plugins|UnitySubsystems)"#)
                .expect("Invalid player log regex"),
            output_log: Regex::new(r#"([a-zA-Z]:[^:"']*)webCaches"#)
                .expect("Invalid output log regex"),
        }
    }
}

/// The HWMI package.
///
/// Reads its settings from a [`PackageConfig`] snapshot taken at construction
/// time. File system, registry and host notifications go through injected
/// collaborators; [`HwmiPackage::new`] wires the real ones.
pub struct HwmiPackage {
    metadata: PackageMetadata,
    config: PackageConfig,
    app_root: Utf8PathBuf,
    appdata_dir: Option<Utf8PathBuf>,
    patterns: EvidencePatterns,
    files: Arc<dyn FileStore>,
    registry: Arc<dyn RegistryStore>,
    events: Arc<dyn EventSink>,
}

impl HwmiPackage {
    /// Create the package for a launcher installed at `app_root`.
    pub fn new(config: PackageConfig, app_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            metadata: hwmi_metadata(),
            config,
            app_root: app_root.into(),
            appdata_dir: default_appdata_dir(),
            patterns: EvidencePatterns::new(),
            files: Arc::new(OsFileStore),
            registry: system_registry(),
            events: Arc::new(TracingEventSink),
        }
    }

    pub fn with_files(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = files;
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistryStore>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Override the per-user `AppData` folder the player logs live under.
    pub fn with_appdata_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.appdata_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// `<app root>/<importer folder>/Core/HWMI/main.ini`
    pub fn main_ini_path(&self) -> Utf8PathBuf {
        self.config.importer.main_ini_path(&self.app_root)
    }

    /// Installed tool version, with the reason when it cannot be read.
    pub fn installed_version(&self) -> Result<ToolVersion> {
        read_version(self.files.as_ref(), &self.main_ini_path())
    }

    /// Folder holding the Unity player logs, if the profile folder is known.
    pub fn log_dir(&self) -> Option<Utf8PathBuf> {
        let appdata = self.appdata_dir.as_ref()?;
        Some(LOG_DIR.iter().fold(appdata.clone(), |dir, part| dir.join(part)))
    }

    /// Evidence sources in trust order: installer records, launcher
    /// manifests, then player logs.
    pub fn evidence_sources(&self) -> Vec<EvidenceSource> {
        let p = &self.patterns;
        let mut sources = vec![EvidenceSource::RegistryUninstallEntries {
            executables: vec![HORIZON_WALKER_EXE.to_string()],
        }];

        for manifest in &self.config.importer.launcher_manifests {
            sources.push(EvidenceSource::JsonManifestFile {
                path: Utf8PathBuf::from(manifest),
                patterns: vec![p.common.clone(), p.install_path.clone()],
            });
        }

        match self.log_dir() {
            Some(log_dir) => {
                for name in ["Player.log", "Player-prev.log"] {
                    sources.push(EvidenceSource::LogFile {
                        path: log_dir.join(name),
                        patterns: vec![p.common.clone(), p.player_log.clone()],
                    });
                }
                sources.push(EvidenceSource::LogFile {
                    path: log_dir.join("output_log.txt"),
                    patterns: vec![p.common.clone(), p.output_log.clone()],
                });
            }
            None => tracing::warn!("Unable to resolve AppData folder, skipping player logs"),
        }

        sources
    }

    /// Merge the launch overlay into `main.ini`, unless the inject mode is
    /// `Bypass`.
    pub fn update_main_ini(&self) -> Result<OverlayOutcome> {
        if self.config.importer.custom_launch_inject_mode == InjectMode::Bypass {
            tracing::info!("Inject mode is Bypass, leaving main.ini untouched");
            return Ok(OverlayOutcome::Bypassed);
        }

        self.events.fire(LauncherEvent::StatusUpdate {
            status: "Updating HWMI main.ini...".to_string(),
        })?;

        let ini_path = self.main_ini_path();
        if !self.files.is_file(&ini_path) {
            return Err(PackageError::ConfigFileMissing { path: ini_path });
        }

        self.events.fire(LauncherEvent::VerifyFileAccess {
            path: ini_path.clone(),
            write: true,
        })?;

        let overlay = LaunchOverlay::resolve(HWMI_FEATURES, &self.config.migoto.toggles());
        overlay.apply(self.files.as_ref(), &ini_path)
    }

    /// Force the in-game frame rate limit to 120.
    pub fn unlock_fps(&self) -> Result<PatchOutcome> {
        unlock_fps(self.registry.as_ref()).map_err(|e| PackageError::FpsUnlock(Box::new(e)))
    }
}

impl ModelImporter for HwmiPackage {
    fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    fn get_installed_version(&self) -> String {
        match self.installed_version() {
            Ok(version) => version.to_string(),
            Err(e) => {
                tracing::debug!("Installed HWMI version unknown: {}", e);
                String::new()
            }
        }
    }

    fn autodetect_game_folders(&self) -> Vec<Utf8PathBuf> {
        let discovery = PathDiscovery::new(
            self.files.as_ref(),
            self.registry.as_ref(),
            vec![HORIZON_WALKER_KNOWN_CHILD.to_string()],
        );
        discovery
            .discover(&self.evidence_sources())
            .into_iter()
            .map(|candidate| candidate.path)
            .collect()
    }

    fn validate_game_exe_path(&self, game_path: &Utf8Path) -> Result<Utf8PathBuf> {
        let exe = game_path.join(HORIZON_WALKER_EXE);
        if !self.files.is_file(&exe) {
            return Err(PackageError::GameExecutableMissing {
                name: HORIZON_WALKER_EXE.to_string(),
                path: exe,
            });
        }
        Ok(exe)
    }

    fn initialize_game_launch(&self, game_path: &Utf8Path) -> Result<()> {
        tracing::info!("Preparing Horizon Walker launch from {}", game_path);

        self.update_main_ini()?;

        if self.config.importer.unlock_fps {
            self.unlock_fps()?;
        }

        Ok(())
    }
}

/// Parent of the roaming application data folder, `%USERPROFILE%\AppData` on
/// Windows.
fn default_appdata_dir() -> Option<Utf8PathBuf> {
    let roaming = dirs::data_dir()?;
    let parent = roaming.parent()?.to_path_buf();
    Utf8PathBuf::from_path_buf(parent).ok()
}
