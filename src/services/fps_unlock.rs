//! Forces the in-game FPS limit by patching the graphics settings record the
//! game keeps in the registry.
//!
//! The record is a `REG_BINARY` value holding null-terminated ASCII JSON. Only
//! the `FPS` field is changed; every other field is written back as read.

use crate::error::{PackageError, Result};
use crate::registry::{RegValueKind, RegistryLookupError, RegistryStore, RegistryValue};
use serde_json::{Map, Value};

pub const GRAPHICS_SETTINGS_KEY: &str = r"Software\Gentlemaniac\Horizon Walker";
pub const GRAPHICS_SETTINGS_VALUE: &str = "GraphicsSettings_Model_h2986158309";
pub const FPS_FIELD: &str = "FPS";
pub const TARGET_FPS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The record was rewritten with the target FPS.
    Applied,
    /// The record already held the target FPS; nothing was written.
    AlreadySatisfied,
}

/// Patch the Horizon Walker graphics settings record to [`TARGET_FPS`].
pub fn unlock_fps(registry: &dyn RegistryStore) -> Result<PatchOutcome> {
    patch_fps_value(
        registry,
        GRAPHICS_SETTINGS_KEY,
        GRAPHICS_SETTINGS_VALUE,
        TARGET_FPS,
    )
}

/// Read-modify-write of a binary JSON settings value.
pub fn patch_fps_value(
    registry: &dyn RegistryStore,
    key: &str,
    value_name: &str,
    target: u32,
) -> Result<PatchOutcome> {
    let stored = registry
        .read_value(key, value_name)
        .map_err(|e| match e {
            RegistryLookupError::KeyNotFound(_) => PackageError::RegistryKeyMissing {
                key: key.to_string(),
            },
            RegistryLookupError::ValueNotFound(_) => PackageError::RegistryValueMissing {
                key: key.to_string(),
                value: value_name.to_string(),
            },
            RegistryLookupError::Io(e) => PackageError::Registry(e),
        })?;

    if stored.kind != RegValueKind::Binary {
        return Err(PackageError::RegistryTypeMismatch { found: stored.kind });
    }

    let Some(bytes) = patch_settings_blob(&stored.bytes, target)? else {
        tracing::info!("{} already set to {} FPS", value_name, target);
        return Ok(PatchOutcome::AlreadySatisfied);
    };

    registry
        .write_value(
            key,
            value_name,
            &RegistryValue {
                kind: stored.kind,
                bytes,
            },
        )
        .map_err(|e| match e {
            RegistryLookupError::Io(e) => PackageError::Registry(e),
            other => PackageError::Registry(std::io::Error::other(other.to_string())),
        })?;

    tracing::info!("Set {} to {} FPS", value_name, target);
    Ok(PatchOutcome::Applied)
}

/// Set the `FPS` field of a null-terminated JSON settings blob.
///
/// Returns `None` when the field already holds `target`.
pub fn patch_settings_blob(raw: &[u8], target: u32) -> Result<Option<Vec<u8>>> {
    let json = match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => {
            tracing::debug!("Graphics settings record is not null-terminated");
            raw
        }
    };

    if !json.is_ascii() {
        return Err(PackageError::ConfigMalformed {
            message: "record is not ASCII text".to_string(),
        });
    }

    let text = String::from_utf8_lossy(json);
    let mut settings: Map<String, Value> =
        serde_json::from_str(&text).map_err(|e| PackageError::ConfigMalformed {
            message: e.to_string(),
        })?;

    let current = settings
        .get(FPS_FIELD)
        .ok_or_else(|| PackageError::ConfigMalformed {
            message: format!("\"{FPS_FIELD}\" key not found"),
        })?;

    if current.as_f64() == Some(f64::from(target)) {
        return Ok(None);
    }

    settings.insert(FPS_FIELD.to_string(), Value::from(target));

    let serialized = serde_json::to_string(&settings).map_err(|e| {
        PackageError::ConfigMalformed {
            message: e.to_string(),
        }
    })?;

    let mut bytes = escape_non_ascii(&serialized).into_bytes();
    bytes.push(0);
    Ok(Some(bytes))
}

/// Re-escape characters that JSON string escapes decoded to non-ASCII, so the
/// record stays ASCII.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}
