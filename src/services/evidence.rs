//! Evidence extraction: pulling path-like strings out of arbitrary text.

use crate::error::{PackageError, Result};
use crate::storage::FileStore;
use camino::Utf8Path;
use regex::Regex;

/// Apply every pattern to the whole text and collect the first capture group
/// of every match.
///
/// Results are ordered by pattern, then by match position. Patterns without a
/// capture group contribute their whole match.
pub fn extract(text: &str, patterns: &[Regex]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| {
            pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Read an evidence file as text, replacing invalid UTF-8 instead of failing.
pub fn read_evidence(files: &dyn FileStore, path: &Utf8Path) -> Result<String> {
    let bytes = files
        .read(path)
        .map_err(|source| PackageError::EvidenceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryFileStore;

    fn pattern(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn test_extract_collects_all_matches_in_pattern_order() {
        let text = "a=C:\\One b=C:\\Two\nx:D:\\Three";
        let patterns = [pattern(r"x:([A-Z]:\\\w+)"), pattern(r"[ab]=([A-Z]:\\\w+)")];

        assert_eq!(
            extract(text, &patterns),
            vec!["D:\\Three", "C:\\One", "C:\\Two"]
        );
    }

    #[test]
    fn test_extract_no_match_is_empty() {
        let patterns = [pattern(r"installPath=(\S+)")];
        assert!(extract("nothing to see here", &patterns).is_empty());
        assert!(extract("", &patterns).is_empty());
    }

    #[test]
    fn test_extract_without_group_uses_whole_match() {
        let patterns = [pattern(r"[A-Z]:\\Games")];
        assert_eq!(extract("at C:\\Games now", &patterns), vec!["C:\\Games"]);
    }

    #[test]
    fn test_read_evidence_tolerates_invalid_utf8() {
        let files = MemoryFileStore::new().with_file("Player.log", b"ok \xff\xfe C:\\Games\n");
        let text = read_evidence(&files, Utf8Path::new("Player.log")).unwrap();
        assert!(text.starts_with("ok "));
        assert!(text.contains("C:\\Games"));
    }

    #[test]
    fn test_read_evidence_missing_file() {
        let files = MemoryFileStore::new();
        let err = read_evidence(&files, Utf8Path::new("missing.log")).unwrap_err();
        assert!(matches!(err, PackageError::EvidenceUnavailable { .. }));
    }
}
