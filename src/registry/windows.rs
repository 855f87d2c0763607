use super::{RegValueKind, RegistryLookupError, RegistryStore, RegistryValue, UninstallEntry};
use std::io;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, RegType};
use winreg::{RegKey, RegValue};

const UNINSTALL_ROOTS: &[&str] = &[
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
    r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
];

/// [`RegistryStore`] backed by the Windows registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinRegistry;

impl RegistryStore for WinRegistry {
    fn uninstall_entries(&self) -> Vec<UninstallEntry> {
        let mut entries = Vec::new();
        for hive in [HKEY_LOCAL_MACHINE, HKEY_CURRENT_USER] {
            let hive = RegKey::predef(hive);
            for root in UNINSTALL_ROOTS {
                collect_uninstall_entries(&hive, root, &mut entries);
            }
        }
        entries
    }

    fn read_value(&self, key: &str, name: &str) -> Result<RegistryValue, RegistryLookupError> {
        let settings = open_user_key(key)?;
        let raw = settings.get_raw_value(name).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RegistryLookupError::ValueNotFound(name.to_string()),
            _ => RegistryLookupError::Io(e),
        })?;
        Ok(RegistryValue {
            kind: kind_from_reg_type(&raw.vtype),
            bytes: raw.bytes,
        })
    }

    fn write_value(
        &self,
        key: &str,
        name: &str,
        value: &RegistryValue,
    ) -> Result<(), RegistryLookupError> {
        let settings = open_user_key(key)?;
        let raw = RegValue {
            bytes: value.bytes.clone(),
            vtype: reg_type_from_kind(value.kind),
        };
        settings.set_raw_value(name, &raw)?;
        Ok(())
    }
}

fn open_user_key(key: &str) -> Result<RegKey, RegistryLookupError> {
    RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey_with_flags(key, KEY_ALL_ACCESS)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RegistryLookupError::KeyNotFound(key.to_string()),
            _ => RegistryLookupError::Io(e),
        })
}

fn collect_uninstall_entries(hive: &RegKey, root: &str, out: &mut Vec<UninstallEntry>) {
    let Ok(uninstall) = hive.open_subkey(root) else {
        return;
    };

    for key_name in uninstall.enum_keys().flatten() {
        let Ok(entry) = uninstall.open_subkey(&key_name) else {
            continue;
        };
        let text = |name: &str| entry.get_value::<String, _>(name).unwrap_or_default();

        out.push(UninstallEntry {
            display_name: text("DisplayName"),
            install_location: text("InstallLocation"),
            display_icon: text("DisplayIcon"),
            uninstall_string: text("UninstallString"),
            key_name,
        });
    }
}

fn kind_from_reg_type(vtype: &RegType) -> RegValueKind {
    match vtype {
        RegType::REG_NONE => RegValueKind::None,
        RegType::REG_SZ => RegValueKind::String,
        RegType::REG_EXPAND_SZ => RegValueKind::ExpandString,
        RegType::REG_BINARY => RegValueKind::Binary,
        RegType::REG_DWORD => RegValueKind::Dword,
        RegType::REG_MULTI_SZ => RegValueKind::MultiString,
        RegType::REG_QWORD => RegValueKind::Qword,
        _ => RegValueKind::Other,
    }
}

fn reg_type_from_kind(kind: RegValueKind) -> RegType {
    match kind {
        RegValueKind::String => RegType::REG_SZ,
        RegValueKind::ExpandString => RegType::REG_EXPAND_SZ,
        RegValueKind::Binary => RegType::REG_BINARY,
        RegValueKind::Dword => RegType::REG_DWORD,
        RegValueKind::MultiString => RegType::REG_MULTI_SZ,
        RegValueKind::Qword => RegType::REG_QWORD,
        RegValueKind::None | RegValueKind::Other => RegType::REG_NONE,
    }
}
