//! Launch configuration overlay.
//!
//! Resolves the declared [`ConfigFeature`]s against the user's toggles into a
//! flat `(section, key) -> value` map and writes it through to the tool's INI
//! file, leaving every other line alone.

use crate::error::{PackageError, Result};
use crate::ini::IniDocument;
use crate::models::ConfigFeature;
use crate::storage::FileStore;
use camino::Utf8Path;
use indexmap::IndexMap;

/// What applying the overlay did to the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
    /// The file changed and was rewritten.
    Written,
    /// Every value already matched; nothing was written.
    Unchanged,
    /// The overlay step was skipped for this launch.
    Bypassed,
}

/// Resolved config writes for one launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOverlay {
    writes: IndexMap<(String, String), String>,
}

impl LaunchOverlay {
    /// Select each feature's writes for its toggle state and union them.
    ///
    /// Features must not share a `(section, key)` target. If they do anyway,
    /// the later declaration wins and a warning is logged.
    pub fn resolve(features: &[ConfigFeature], toggles: &IndexMap<String, bool>) -> Self {
        let mut writes = IndexMap::new();

        for feature in features {
            let enabled = toggles.get(feature.name).copied();
            for write in feature.writes(enabled) {
                let target = (write.section.to_string(), write.key.to_string());
                let value = write.value.to_string();
                if let Some(previous) = writes.insert(target, value) {
                    tracing::warn!(
                        "Feature {} overrides [{}] {} (was {})",
                        feature.name,
                        write.section,
                        write.key,
                        previous
                    );
                }
            }
        }

        Self { writes }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.writes
            .get(&(section.to_string(), key.to_string()))
            .map(String::as_str)
    }

    fn len(&self) -> usize {
        self.writes.len()
    }

    /// Merge the overlay into a parsed document.
    pub fn apply_to(&self, doc: &mut IniDocument) {
        for ((section, key), value) in &self.writes {
            doc.set(section, key, value);
        }
    }

    /// Merge the overlay into the INI file at `ini_path`, writing only if a
    /// value actually changed.
    pub fn apply(&self, files: &dyn FileStore, ini_path: &Utf8Path) -> Result<OverlayOutcome> {
        if !files.is_file(ini_path) {
            return Err(PackageError::ConfigFileMissing {
                path: ini_path.to_path_buf(),
            });
        }

        let bytes = files
            .read(ini_path)
            .map_err(|e| PackageError::io(ini_path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            PackageError::ConfigFileNotUtf8 {
                path: ini_path.to_path_buf(),
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            }
        })?;
        let mut doc = IniDocument::parse(&text);

        self.apply_to(&mut doc);

        if !doc.is_modified() {
            tracing::debug!("{} is up to date", ini_path);
            return Ok(OverlayOutcome::Unchanged);
        }

        files
            .write(ini_path, doc.to_string().as_bytes())
            .map_err(|e| PackageError::io(ini_path, e))?;
        tracing::info!("Updated {} ({} overlay values)", ini_path, self.len());
        Ok(OverlayOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureStates, HWMI_FEATURES, IniValue, IniWrite, MigotoConfig};
    use crate::storage::MemoryFileStore;
    use proptest::prelude::*;

    fn toggles(pairs: &[(&str, bool)]) -> IndexMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_resolve_defaults() {
        let overlay = LaunchOverlay::resolve(HWMI_FEATURES, &MigotoConfig::default().toggles());

        assert_eq!(overlay.get("Loader", "loader"), Some("XXMI Launcher.exe"));
        assert_eq!(overlay.get("Rendering", "texture_hash"), Some("0"));
        assert_eq!(overlay.get("Rendering", "track_texture_updates"), Some("0"));
        assert_eq!(overlay.get("Logging", "calls"), Some("0"));
        assert_eq!(overlay.get("Logging", "show_warnings"), Some("0"));
        assert_eq!(overlay.get("Hunting", "hunting"), Some("0"));
        assert_eq!(overlay.get("Hunting", "marking_actions"), Some("clipboard"));
        assert_eq!(overlay.len(), 8);
    }

    #[test]
    fn test_resolve_enabled_toggles() {
        let overlay = LaunchOverlay::resolve(
            HWMI_FEATURES,
            &toggles(&[
                ("enable_hunting", true),
                ("dump_shaders", true),
                ("mute_warnings", false),
                ("calls_logging", true),
            ]),
        );

        assert_eq!(overlay.get("Hunting", "hunting"), Some("2"));
        assert_eq!(
            overlay.get("Hunting", "marking_actions"),
            Some("clipboard hlsl asm regex")
        );
        assert_eq!(overlay.get("Logging", "show_warnings"), Some("1"));
        assert_eq!(overlay.get("Logging", "calls"), Some("1"));
        assert_eq!(overlay.get("Logging", "debug"), Some("0"));
    }

    #[test]
    fn test_overlapping_features_later_declaration_wins() {
        const FIRST: &[IniWrite] = &[IniWrite {
            section: "A",
            key: "x",
            value: IniValue::Int(1),
        }];
        const SECOND: &[IniWrite] = &[IniWrite {
            section: "A",
            key: "x",
            value: IniValue::Int(2),
        }];
        let features = [
            ConfigFeature {
                name: "first",
                states: FeatureStates::Constant(FIRST),
            },
            ConfigFeature {
                name: "second",
                states: FeatureStates::Constant(SECOND),
            },
        ];

        let overlay = LaunchOverlay::resolve(&features, &IndexMap::new());
        assert_eq!(overlay.get("A", "x"), Some("2"));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn test_apply_missing_file() {
        let files = MemoryFileStore::new();
        let overlay = LaunchOverlay::resolve(HWMI_FEATURES, &IndexMap::new());

        let err = overlay
            .apply(&files, Utf8Path::new("HWMI/Core/HWMI/main.ini"))
            .unwrap_err();
        assert!(matches!(err, PackageError::ConfigFileMissing { .. }));
    }

    #[test]
    fn test_apply_writes_once_then_unchanged() {
        let path = Utf8Path::new("HWMI/Core/HWMI/main.ini");
        let files = MemoryFileStore::new().with_file(path, "[Logging]\ncalls = 1\n; keep me\n");
        let overlay = LaunchOverlay::resolve(HWMI_FEATURES, &MigotoConfig::default().toggles());

        assert_eq!(overlay.apply(&files, path).unwrap(), OverlayOutcome::Written);
        assert_eq!(overlay.apply(&files, path).unwrap(), OverlayOutcome::Unchanged);
        assert_eq!(files.writes().len(), 1);

        let text = files.contents(path).unwrap();
        assert!(text.starts_with("[Logging]\ncalls = 0\n; keep me\n"));
        assert!(text.contains("[Loader]\nloader = XXMI Launcher.exe"));
    }

    #[test]
    fn test_apply_refuses_invalid_utf8() {
        let path = Utf8Path::new("HWMI/Core/HWMI/main.ini");
        let original = b"[Logging]\ncalls = 1\n; Autor: Jos\xe9\n".to_vec();
        let files = MemoryFileStore::new().with_file(path, &original);
        let overlay = LaunchOverlay::resolve(HWMI_FEATURES, &MigotoConfig::default().toggles());

        let err = overlay.apply(&files, path).unwrap_err();
        assert!(matches!(
            err,
            PackageError::ConfigFileNotUtf8 { line: 3, .. }
        ));
        assert!(files.writes().is_empty());
        assert_eq!(files.read(path).unwrap(), original);
    }

    proptest! {
        #[test]
        fn prop_resolution_ignores_declaration_order(
            order in Just((0..HWMI_FEATURES.len()).collect::<Vec<_>>()).prop_shuffle(),
            flags in prop::collection::vec(any::<bool>(), 5),
        ) {
            let names = ["calls_logging", "debug_logging", "mute_warnings", "enable_hunting", "dump_shaders"];
            let toggles: IndexMap<String, bool> = names
                .iter()
                .zip(flags)
                .map(|(n, f)| (n.to_string(), f))
                .collect();

            let shuffled: Vec<ConfigFeature> = order.iter().map(|&i| HWMI_FEATURES[i]).collect();

            let declared = LaunchOverlay::resolve(HWMI_FEATURES, &toggles);
            let reordered = LaunchOverlay::resolve(&shuffled, &toggles);
            prop_assert_eq!(declared, reordered);
        }
    }
}
