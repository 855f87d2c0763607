//! Candidate path normalization and validation.
//!
//! Strings pulled out of logs and manifests are noisy: they carry quotes,
//! JSON-escaped separators, mixed `/` and `\`, and often point somewhere deep
//! inside the game folder. Validation walks up from the candidate until it
//! finds a folder that directly contains one of the title's known children.

use crate::error::{PackageError, Result};
use crate::storage::FileStore;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::MAIN_SEPARATOR_STR;

/// How many parent levels above the candidate are searched.
pub const MAX_ANCESTOR_DEPTH: usize = 6;

/// Normalize a raw candidate string into a path.
///
/// Strips surrounding whitespace and quotes, accepts either separator (and
/// doubled separators from JSON escaping), resolves `.` and `..`, drops
/// trailing separators and joins with the host separator. A leading double
/// separator marks a UNC path; its server and share are never popped by `..`.
pub fn normalize_candidate(raw: &str) -> Option<Utf8PathBuf> {
    let trimmed = raw.trim().trim_matches(['"', '\'']).trim();
    if trimmed.is_empty() {
        return None;
    }

    let rooted = trimmed.starts_with(['/', '\\']);
    let unc = rooted && trimmed[1..].starts_with(['/', '\\']);
    let mut parts: Vec<&str> = Vec::new();
    let mut drive: Option<&str> = None;

    for (index, part) in trimmed.split(['/', '\\']).enumerate() {
        match part {
            "" | "." => {}
            ".." if unc && parts.len() <= 2 => {}
            ".." => {
                parts.pop();
            }
            _ if index == 0 && is_drive(part) => drive = Some(part),
            _ => parts.push(part),
        }
    }

    let body = parts.join(MAIN_SEPARATOR_STR);
    let normalized = match drive {
        Some(drive) => format!("{drive}{MAIN_SEPARATOR_STR}{body}"),
        None if unc && parts.len() >= 2 => {
            format!("{MAIN_SEPARATOR_STR}{MAIN_SEPARATOR_STR}{body}")
        }
        None if unc => return None,
        None if rooted => format!("{MAIN_SEPARATOR_STR}{body}"),
        None if body.is_empty() => return None,
        None => body,
    };

    Some(Utf8PathBuf::from(normalized))
}

/// Comparison key for deduplication: case-insensitive, separator-insensitive,
/// trailing-separator-insensitive.
pub fn path_key(path: &Utf8Path) -> String {
    path.as_str()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_lowercase()
}

/// Resolve a candidate string to the installation root, if any folder from the
/// candidate up to [`MAX_ANCESTOR_DEPTH`] parents directly contains one of
/// `known_children`.
pub fn validate(
    files: &dyn FileStore,
    candidate: &str,
    known_children: &[String],
) -> Option<Utf8PathBuf> {
    validate_candidate(files, candidate, known_children).ok()
}

pub(crate) fn validate_candidate(
    files: &dyn FileStore,
    candidate: &str,
    known_children: &[String],
) -> Result<Utf8PathBuf> {
    let rejected = || PackageError::PathNotValidated {
        candidate: candidate.to_string(),
    };

    let normalized = normalize_candidate(candidate).ok_or_else(rejected)?;

    let mut current: Option<&Utf8Path> = Some(&normalized);
    for _ in 0..=MAX_ANCESTOR_DEPTH {
        let Some(dir) = current.filter(|d| !d.as_str().is_empty()) else {
            break;
        };
        if known_children
            .iter()
            .any(|child| files.exists(&dir.join(child)))
        {
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }

    Err(rejected())
}

fn is_drive(part: &str) -> bool {
    let bytes = part.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryFileStore;
    use proptest::prelude::*;

    fn native(path: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(path.replace('/', MAIN_SEPARATOR_STR))
    }

    fn children(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_mixed_separators_and_quotes() {
        assert_eq!(
            normalize_candidate(r#""C:/Games\Foo\\Bar\""#),
            Some(native("C:/Games/Foo/Bar"))
        );
    }

    #[test]
    fn test_normalize_json_escaped_backslashes() {
        assert_eq!(
            normalize_candidate(r"D:\\Games\\Horizon Walker Games"),
            Some(native("D:/Games/Horizon Walker Games"))
        );
    }

    #[test]
    fn test_normalize_dot_segments() {
        assert_eq!(
            normalize_candidate(r"C:\Games\.\Foo\Data\..\Bin\"),
            Some(native("C:/Games/Foo/Bin"))
        );
        assert_eq!(normalize_candidate(r"C:\..\.."), Some(native("C:/")));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize_candidate("  \"\" "), None);
        assert_eq!(normalize_candidate(r"\.\"), Some(native("/")));
        assert_eq!(normalize_candidate("./.."), None);
    }

    #[test]
    fn test_normalize_keeps_unc_prefix() {
        let share = Some(native("//nas/games/HW"));
        assert_eq!(normalize_candidate(r"\\nas\games\HW\"), share);
        assert_eq!(normalize_candidate(r"\\\\nas\\games\\HW"), share);
        assert_eq!(
            normalize_candidate("//nas/games/HW/../../.."),
            Some(native("//nas/games"))
        );
        assert_eq!(normalize_candidate(r"\\nas"), None);
    }

    #[test]
    fn test_validate_game_on_network_share() {
        let files = MemoryFileStore::new().with_dir(r"\\nas\games\HW\Foo_Data");
        let known = children(&["Foo_Data"]);

        assert_eq!(
            validate(&files, r"\\nas\games\HW\Foo_Data\Plugins", &known),
            Some(native("//nas/games/HW"))
        );
    }

    #[test]
    fn test_path_key_ignores_case_and_separators() {
        assert_eq!(
            path_key(Utf8Path::new(r"C:\Games\Foo\")),
            path_key(Utf8Path::new("c:/games/foo"))
        );
    }

    #[test]
    fn test_validate_returns_root_containing_child() {
        let files = MemoryFileStore::new().with_dir("C:/Games/Foo/Foo_Data/Plugins");
        let known = children(&["Foo_Data"]);

        let root = validate(&files, r"C:\Games\Foo\Foo_Data\Plugins\x86_64", &known);
        assert_eq!(root, Some(native("C:/Games/Foo")));

        let root = validate(&files, r"C:\Games\Foo", &known);
        assert_eq!(root, Some(native("C:/Games/Foo")));
    }

    #[test]
    fn test_validate_accepts_any_known_child() {
        let files = MemoryFileStore::new().with_file("E:/Foo/Foo.exe", b"MZ");
        let known = children(&["Foo_Data", "Foo.exe"]);

        assert_eq!(validate(&files, "E:/Foo/logs", &known), Some(native("E:/Foo")));
    }

    #[test]
    fn test_validate_rejects_unrelated_path() {
        let files = MemoryFileStore::new().with_dir("C:/Games/Foo/Foo_Data");
        let known = children(&["Foo_Data"]);

        assert_eq!(validate(&files, r"C:\Windows\System32", &known), None);
        assert!(matches!(
            validate_candidate(&files, "", &known),
            Err(PackageError::PathNotValidated { .. })
        ));
    }

    #[test]
    fn test_validate_stops_at_search_depth() {
        let files = MemoryFileStore::new().with_dir("C:/Root/Foo_Data");
        let known = children(&["Foo_Data"]);
        let deep = "C:/Root/1/2/3/4/5/6/7";

        assert_eq!(validate(&files, deep, &known), None);
        assert_eq!(
            validate(&files, "C:/Root/1/2/3/4/5/6", &known),
            Some(native("C:/Root"))
        );
    }

    proptest! {
        #[test]
        fn prop_validate_finds_ancestor(
            root in prop::collection::vec("r[a-z]{1,6}", 1..4),
            child in "k[a-z]{1,6}",
            deeper in prop::collection::vec("d[a-z]{1,6}", 0..=MAX_ANCESTOR_DEPTH),
        ) {
            let root_path = format!("X:/{}", root.join("/"));
            let files = MemoryFileStore::new().with_dir(format!("{root_path}/{child}"));

            let mut candidate = root_path.clone();
            for part in &deeper {
                candidate.push('\\');
                candidate.push_str(part);
            }

            let found = validate(&files, &candidate, &[child]);
            prop_assert_eq!(found, normalize_candidate(&root_path));
        }
    }
}
