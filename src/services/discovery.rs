//! Multi-source game folder discovery.
//!
//! Sources are queried in declaration order and their results concatenated,
//! so the declaration order doubles as the trust ranking: installer records
//! first, launcher manifests next, application logs last. A source that cannot
//! be read contributes nothing; it never aborts discovery.

use crate::error::Result;
use crate::registry::{RegistryStore, UninstallEntry};
use crate::services::evidence::{extract, read_evidence};
use crate::services::path_validation::{normalize_candidate, path_key, validate_candidate};
use crate::storage::FileStore;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::collections::HashSet;

/// Where a piece of path evidence comes from.
#[derive(Debug, Clone)]
pub enum EvidenceSource {
    /// OS installer records whose install folder holds one of the executables.
    RegistryUninstallEntries { executables: Vec<String> },

    /// Launcher JSON manifest, matched as raw text.
    JsonManifestFile { path: Utf8PathBuf, patterns: Vec<Regex> },

    /// Free-form application log.
    LogFile { path: Utf8PathBuf, patterns: Vec<Regex> },
}

impl EvidenceSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            EvidenceSource::RegistryUninstallEntries { .. } => SourceKind::Registry,
            EvidenceSource::JsonManifestFile { .. } => SourceKind::Manifest,
            EvidenceSource::LogFile { .. } => SourceKind::Log,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Registry,
    Manifest,
    Log,
}

/// A validated installation root and the kind of source that produced it.
///
/// Two candidates are equal when their paths are the same ignoring case,
/// separator style and trailing separators.
#[derive(Debug, Clone)]
pub struct PathCandidate {
    pub path: Utf8PathBuf,
    pub source: SourceKind,
}

impl PathCandidate {
    pub fn key(&self) -> String {
        path_key(&self.path)
    }
}

impl PartialEq for PathCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PathCandidate {}

/// Runs evidence sources against the file system and registry.
pub struct PathDiscovery<'a> {
    files: &'a dyn FileStore,
    registry: &'a dyn RegistryStore,
    known_children: Vec<String>,
}

impl<'a> PathDiscovery<'a> {
    pub fn new(
        files: &'a dyn FileStore,
        registry: &'a dyn RegistryStore,
        known_children: Vec<String>,
    ) -> Self {
        Self {
            files,
            registry,
            known_children,
        }
    }

    /// Query every source in order and return the deduplicated candidates,
    /// first occurrence wins.
    pub fn discover(&self, sources: &[EvidenceSource]) -> Vec<PathCandidate> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for source in sources {
            let kind = source.kind();
            for path in self.query(source) {
                let candidate = PathCandidate { path, source: kind };
                if seen.insert(candidate.key()) {
                    out.push(candidate);
                } else {
                    tracing::debug!("Skipping duplicate game folder {}", candidate.path);
                }
            }
        }

        tracing::info!("Discovered {} game folder candidate(s)", out.len());
        out
    }

    fn query(&self, source: &EvidenceSource) -> Vec<Utf8PathBuf> {
        match source {
            EvidenceSource::RegistryUninstallEntries { executables } => {
                self.from_installer_records(executables)
            }
            EvidenceSource::JsonManifestFile { path, patterns } => {
                match self.manifest_text(path) {
                    Ok(Some(text)) => self.from_text(&text, patterns),
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        tracing::debug!("{}", e);
                        Vec::new()
                    }
                }
            }
            EvidenceSource::LogFile { path, patterns } => {
                match read_evidence(self.files, path) {
                    Ok(text) => self.from_text(&text, patterns),
                    Err(e) => {
                        tracing::debug!("{}", e);
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Manifest text, or `None` when it is not valid JSON.
    fn manifest_text(&self, path: &Utf8Path) -> Result<Option<String>> {
        let text = read_evidence(self.files, path)?;
        if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
            tracing::warn!("Ignoring malformed launcher manifest {}: {}", path, e);
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn from_text(&self, text: &str, patterns: &[Regex]) -> Vec<Utf8PathBuf> {
        extract(text, patterns)
            .into_iter()
            .filter_map(|raw| {
                match validate_candidate(self.files, &raw, &self.known_children) {
                    Ok(root) => Some(root),
                    Err(e) => {
                        tracing::trace!("{}", e);
                        None
                    }
                }
            })
            .collect()
    }

    fn from_installer_records(&self, executables: &[String]) -> Vec<Utf8PathBuf> {
        let entries = self.registry.uninstall_entries();
        let mut out = Vec::new();

        for entry in &entries {
            for exe in executables {
                let root = install_roots(entry, exe)
                    .into_iter()
                    .find(|root| self.files.is_file(&root.join(exe)));
                if let Some(root) = root {
                    tracing::debug!("Installer record {} points at {}", entry.key_name, root);
                    out.push(root);
                }
            }
        }

        out
    }
}

/// Folders that may hold `exe` according to an installer record.
///
/// Icon and uninstaller paths that name the executable come before the bare
/// install location.
fn install_roots(entry: &UninstallEntry, exe: &str) -> Vec<Utf8PathBuf> {
    let exe_lower = exe.to_ascii_lowercase();

    let mut roots: Vec<Utf8PathBuf> = [
        &entry.display_icon,
        &entry.uninstall_string,
        &entry.install_location,
    ]
    .into_iter()
    .filter_map(|field| {
        let pos = field.to_ascii_lowercase().find(&exe_lower)?;
        normalize_candidate(&field[..pos])
    })
    .collect();

    roots.extend(normalize_candidate(&entry.install_location));
    roots
}
