use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Persisted package configuration from `HWMI Config.yaml`.
///
/// Written by the launcher's settings UI, read once per launch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(rename = "Importer", default)]
    pub importer: ImporterConfig,

    #[serde(rename = "Migoto", default)]
    pub migoto: MigotoConfig,
}

/// How the launcher injects the model importer into the game process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjectMode {
    #[default]
    Inject,
    Hook,
    /// Launch the game without touching the importer at all.
    Bypass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImporterConfig {
    #[serde(default = "default_importer_folder")]
    pub importer_folder: String,

    #[serde(default)]
    pub game_folder: String,

    #[serde(default)]
    pub launch_options: String,

    #[serde(default)]
    pub custom_launch_inject_mode: InjectMode,

    #[serde(default)]
    pub unlock_fps: bool,

    /// Launcher JSON manifests searched for the game folder.
    #[serde(default)]
    pub launcher_manifests: Vec<String>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            importer_folder: default_importer_folder(),
            game_folder: String::new(),
            launch_options: String::new(),
            custom_launch_inject_mode: InjectMode::default(),
            unlock_fps: false,
            launcher_manifests: Vec::new(),
        }
    }
}

impl ImporterConfig {
    /// Importer installation folder under the launcher root.
    pub fn importer_path(&self, app_root: &Utf8Path) -> Utf8PathBuf {
        app_root.join(self.importer_folder.trim_end_matches(['/', '\\']))
    }

    /// The tool's own configuration file, `Core/HWMI/main.ini`.
    pub fn main_ini_path(&self, app_root: &Utf8Path) -> Utf8PathBuf {
        self.importer_path(app_root)
            .join("Core")
            .join("HWMI")
            .join("main.ini")
    }
}

fn default_importer_folder() -> String {
    "HWMI/".to_string()
}

/// 3Dmigoto feature toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigotoConfig {
    #[serde(default)]
    pub calls_logging: bool,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_true")]
    pub mute_warnings: bool,

    #[serde(default)]
    pub enable_hunting: bool,

    #[serde(default)]
    pub dump_shaders: bool,
}

impl Default for MigotoConfig {
    fn default() -> Self {
        Self {
            calls_logging: false,
            debug_logging: false,
            mute_warnings: true,
            enable_hunting: false,
            dump_shaders: false,
        }
    }
}

impl MigotoConfig {
    /// Toggles keyed by feature name, in declaration order.
    pub fn toggles(&self) -> IndexMap<String, bool> {
        [
            ("calls_logging", self.calls_logging),
            ("debug_logging", self.debug_logging),
            ("mute_warnings", self.mute_warnings),
            ("enable_hunting", self.enable_hunting),
            ("dump_shaders", self.dump_shaders),
        ]
        .into_iter()
        .map(|(name, on)| (name.to_string(), on))
        .collect()
    }
}

fn default_true() -> bool {
    true
}
