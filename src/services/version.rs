//! Installed HWMI version, read from the `global $version = ...` marker in
//! `main.ini`.
//!
//! The marker is written as `<major>.<minor><patch>` where the minor component
//! is exactly one digit and the patch component is whatever digits follow it,
//! so `3.52` means 3.5.2 and `3.5` means 3.5.0.

use crate::error::{PackageError, Result};
use crate::storage::FileStore;
use camino::Utf8Path;
use std::fmt;

const VERSION_PREFIX: &str = "global $version = ";

/// Three-component tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ToolVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Read and parse the version marker from the tool's config file.
pub fn read_version(files: &dyn FileStore, ini_path: &Utf8Path) -> Result<ToolVersion> {
    if !files.is_file(ini_path) {
        return Err(PackageError::ConfigFileMissing {
            path: ini_path.to_path_buf(),
        });
    }

    let bytes = files
        .read(ini_path)
        .map_err(|e| PackageError::io(ini_path, e))?;
    let text = String::from_utf8_lossy(&bytes);

    parse_version(&text)?.ok_or_else(|| PackageError::VersionMarkerNotFound {
        path: ini_path.to_path_buf(),
    })
}

/// Scan lines for the first version marker.
///
/// Returns `Ok(None)` when no line carries the marker and an error when a line
/// starts the marker (`global $version = <digits>.`) but the digits after the
/// dot cannot be split into minor and patch.
pub fn parse_version(text: &str) -> Result<Option<ToolVersion>> {
    for line in text.lines() {
        if let Some(version) = parse_marker_line(line)? {
            return Ok(Some(version));
        }
    }
    Ok(None)
}

fn parse_marker_line(line: &str) -> Result<Option<ToolVersion>> {
    let Some(rest) = line.strip_prefix(VERSION_PREFIX) else {
        return Ok(None);
    };

    let (major, rest) = split_digits(rest);
    if major.is_empty() {
        return Ok(None);
    }

    let Some(rest) = rest.strip_prefix('.') else {
        return Ok(None);
    };
    // Extra dots are tolerated, as in `3..52`.
    let rest = rest.trim_start_matches('.');

    let malformed = || PackageError::MalformedVersion {
        line: line.to_string(),
    };

    let (digits, _) = split_digits(rest);
    let mut chars = digits.chars();
    let Some(minor) = chars.next() else {
        return Err(malformed());
    };
    let patch = chars.as_str();

    let major = major.parse().map_err(|_| malformed())?;
    let minor = minor.to_digit(10).ok_or_else(malformed)?;
    let patch = if patch.is_empty() {
        0
    } else {
        patch.parse().map_err(|_| malformed())?
    };

    Ok(Some(ToolVersion::new(major, minor, patch)))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}
