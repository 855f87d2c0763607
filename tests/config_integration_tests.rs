//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Defaults for missing files and missing fields
//! - Hand-written settings files as the launcher UI produces them
//! - Feeding a loaded configuration into the package

use camino::Utf8PathBuf;
use hwmi_importer::storage::MemoryFileStore;
use hwmi_importer::{ConfigManager, HwmiPackage, InjectMode, ModelImporter, PackageConfig};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(
        manager.config_path(),
        config_path.join("HWMI Config.yaml").as_path()
    );
}

#[test]
fn test_load_default_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = manager.load_config().unwrap();

    assert_eq!(config.importer.importer_folder, "HWMI/");
    assert_eq!(config.importer.custom_launch_inject_mode, InjectMode::Inject);
    assert!(!config.importer.unlock_fps);
    assert!(config.importer.launcher_manifests.is_empty());
    assert!(config.migoto.mute_warnings);
    assert!(!config.migoto.enable_hunting);
}

#[test]
fn test_load_hand_written_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let yaml = r#"Importer:
  importer_folder: Importers/HWMI/
  game_folder: 'D:\Games\Horizon Walker'
  custom_launch_inject_mode: Bypass
  unlock_fps: true
  launcher_manifests:
    - 'C:\Program Files\Launcher\gamedata.json'
Migoto:
  dump_shaders: true
  mute_warnings: false
"#;
    fs::write(config_path.join("HWMI Config.yaml"), yaml).unwrap();

    let config = manager.load_config().unwrap();

    assert_eq!(config.importer.importer_folder, "Importers/HWMI/");
    assert_eq!(config.importer.game_folder, r"D:\Games\Horizon Walker");
    assert_eq!(config.importer.custom_launch_inject_mode, InjectMode::Bypass);
    assert!(config.importer.unlock_fps);
    assert_eq!(config.importer.launcher_manifests.len(), 1);
    assert!(config.migoto.dump_shaders);
    assert!(!config.migoto.mute_warnings);
    assert!(!config.migoto.calls_logging);
}

#[test]
fn test_save_then_load_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut config = PackageConfig::default();
    config.importer.game_folder = r"E:\HW".to_string();
    config.migoto.debug_logging = true;
    manager.save_config(&config).unwrap();

    let saved = fs::read_to_string(manager.config_path()).unwrap();
    assert!(saved.contains("Importer:"));
    assert!(saved.contains("Migoto:"));

    let loaded = manager.load_config().unwrap();
    assert_eq!(loaded.importer.game_folder, r"E:\HW");
    assert!(loaded.migoto.debug_logging);
}

#[test]
fn test_unknown_inject_mode_is_rejected() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        manager.config_path(),
        "Importer:\n  custom_launch_inject_mode: Teleport\n",
    )
    .unwrap();

    assert!(manager.load_config().is_err());
}

#[test]
fn test_custom_importer_folder_moves_main_ini() {
    let mut config = PackageConfig::default();
    config.importer.importer_folder = "Importers/HWMI/".to_string();

    let files = MemoryFileStore::new().with_file(
        r"C:\XXMI\Importers\HWMI\Core\HWMI\main.ini",
        "global $version = 1.02\n",
    );
    let package = HwmiPackage::new(config, r"C:\XXMI").with_files(Arc::new(files));

    assert_eq!(package.get_installed_version(), "1.0.2");
}
