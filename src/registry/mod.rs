//! Registry access seam.
//!
//! Two concerns go through [`RegistryStore`]: enumerating installer
//! (uninstall) records for game folder discovery, and reading/writing a single
//! value under the current user hive for the FPS unlock. On Windows the store
//! is backed by `winreg`; other hosts get an empty store, which makes discovery
//! skip the registry source and the FPS unlock report a missing key.

#[cfg(windows)]
mod windows;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[cfg(windows)]
pub use windows::WinRegistry;

/// Value type tag of a registry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegValueKind {
    None,
    String,
    ExpandString,
    Binary,
    Dword,
    MultiString,
    Qword,
    Other,
}

impl fmt::Display for RegValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegValueKind::None => "REG_NONE",
            RegValueKind::String => "REG_SZ",
            RegValueKind::ExpandString => "REG_EXPAND_SZ",
            RegValueKind::Binary => "REG_BINARY",
            RegValueKind::Dword => "REG_DWORD",
            RegValueKind::MultiString => "REG_MULTI_SZ",
            RegValueKind::Qword => "REG_QWORD",
            RegValueKind::Other => "REG_UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Raw registry value: bytes plus their declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValue {
    pub kind: RegValueKind,
    pub bytes: Vec<u8>,
}

impl RegistryValue {
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RegValueKind::Binary,
            bytes: bytes.into(),
        }
    }
}

/// One installer record from an `Uninstall` registry key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallEntry {
    pub key_name: String,
    pub display_name: String,
    pub install_location: String,
    pub display_icon: String,
    pub uninstall_string: String,
}

/// Lookup failures, kept apart so callers can tell a missing key from a
/// missing value.
#[derive(Error, Debug)]
pub enum RegistryLookupError {
    #[error("registry key {0} not found")]
    KeyNotFound(String),

    #[error("registry value {0} not found")]
    ValueNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Registry capability used by the package. Value paths are relative to the
/// current user hive.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryStore: Send + Sync {
    /// All installer records visible to the current user.
    fn uninstall_entries(&self) -> Vec<UninstallEntry>;

    fn read_value(&self, key: &str, name: &str) -> Result<RegistryValue, RegistryLookupError>;

    fn write_value(
        &self,
        key: &str,
        name: &str,
        value: &RegistryValue,
    ) -> Result<(), RegistryLookupError>;
}

/// Registry store for the host platform.
#[cfg(windows)]
pub fn system_registry() -> Arc<dyn RegistryStore> {
    Arc::new(WinRegistry)
}

/// Registry store for the host platform.
#[cfg(not(windows))]
pub fn system_registry() -> Arc<dyn RegistryStore> {
    Arc::new(MemoryRegistry::new())
}

/// In-memory [`RegistryStore`] that counts writes.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RwLock<BTreeMap<String, BTreeMap<String, RegistryValue>>>,
    entries: Vec<UninstallEntry>,
    writes: AtomicUsize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uninstall_entry(mut self, entry: UninstallEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Create a key with no values.
    pub fn with_key(self, key: &str) -> Self {
        if let Ok(mut keys) = self.keys.write() {
            keys.entry(key.to_lowercase()).or_default();
        }
        self
    }

    pub fn with_value(self, key: &str, name: &str, value: RegistryValue) -> Self {
        if let Ok(mut keys) = self.keys.write() {
            keys.entry(key.to_lowercase())
                .or_default()
                .insert(name.to_lowercase(), value);
        }
        self
    }

    pub fn value(&self, key: &str, name: &str) -> Option<RegistryValue> {
        let keys = self.keys.read().ok()?;
        keys.get(&key.to_lowercase())?
            .get(&name.to_lowercase())
            .cloned()
    }

    /// Number of successful [`RegistryStore::write_value`] calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl RegistryStore for MemoryRegistry {
    fn uninstall_entries(&self) -> Vec<UninstallEntry> {
        self.entries.clone()
    }

    fn read_value(&self, key: &str, name: &str) -> Result<RegistryValue, RegistryLookupError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| std::io::Error::other("memory registry poisoned"))?;
        let values = keys
            .get(&key.to_lowercase())
            .ok_or_else(|| RegistryLookupError::KeyNotFound(key.to_string()))?;
        values
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RegistryLookupError::ValueNotFound(name.to_string()))
    }

    fn write_value(
        &self,
        key: &str,
        name: &str,
        value: &RegistryValue,
    ) -> Result<(), RegistryLookupError> {
        let mut keys = self
            .keys
            .write()
            .map_err(|_| std::io::Error::other("memory registry poisoned"))?;
        let values = keys
            .get_mut(&key.to_lowercase())
            .ok_or_else(|| RegistryLookupError::KeyNotFound(key.to_string()))?;
        values.insert(name.to_lowercase(), value.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_registry_distinguishes_key_and_value() {
        let registry = MemoryRegistry::new().with_key(r"Software\Vendor\Game");

        assert!(matches!(
            registry.read_value(r"Software\Other", "Settings"),
            Err(RegistryLookupError::KeyNotFound(_))
        ));
        assert!(matches!(
            registry.read_value(r"Software\Vendor\Game", "Settings"),
            Err(RegistryLookupError::ValueNotFound(_))
        ));
    }

    #[test]
    fn test_memory_registry_write_counts() {
        let registry = MemoryRegistry::new().with_key("Software\\Vendor");
        registry
            .write_value("software\\vendor", "Blob", &RegistryValue::binary(vec![1, 2]))
            .unwrap();

        assert_eq!(registry.write_count(), 1);
        assert_eq!(
            registry.value("Software\\Vendor", "blob"),
            Some(RegistryValue::binary(vec![1, 2]))
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(RegValueKind::Binary.to_string(), "REG_BINARY");
        assert_eq!(RegValueKind::Dword.to_string(), "REG_DWORD");
    }
}
