//! File access seam.
//!
//! Discovery, version parsing and the overlay never touch `std::fs` directly;
//! they go through a [`FileStore`] so tests can run against an in-memory tree
//! with Windows-style paths on any host.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::sync::RwLock;

/// Minimal file-system capability used by the package.
pub trait FileStore: Send + Sync {
    /// Read a whole file.
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;

    /// Replace a file's contents.
    fn write(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()>;

    fn is_file(&self, path: &Utf8Path) -> bool;

    fn is_dir(&self, path: &Utf8Path) -> bool;

    fn exists(&self, path: &Utf8Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }
}

/// [`FileStore`] backed by the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileStore;

impl FileStore for OsFileStore {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        path.is_dir()
    }
}

/// In-memory [`FileStore`].
///
/// Paths are compared case-insensitively with `/` and `\` treated as the same
/// separator. Directories exist implicitly for every ancestor of a stored file,
/// and can also be created empty with [`MemoryFileStore::add_dir`].
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    dirs: RwLock<BTreeSet<String>>,
    writes: RwLock<Vec<Utf8PathBuf>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to seed a file.
    pub fn with_file(self, path: impl AsRef<Utf8Path>, contents: impl AsRef<[u8]>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Builder-style helper to seed an empty directory.
    pub fn with_dir(self, path: impl AsRef<Utf8Path>) -> Self {
        self.add_dir(path);
        self
    }

    pub fn add_file(&self, path: impl AsRef<Utf8Path>, contents: impl AsRef<[u8]>) {
        let key = store_key(path.as_ref().as_str());
        if let Ok(mut files) = self.files.write() {
            files.insert(key, contents.as_ref().to_vec());
        }
    }

    pub fn add_dir(&self, path: impl AsRef<Utf8Path>) {
        if let Ok(mut dirs) = self.dirs.write() {
            dirs.insert(store_key(path.as_ref().as_str()));
        }
    }

    /// Paths passed to [`FileStore::write`], in call order.
    pub fn writes(&self) -> Vec<Utf8PathBuf> {
        self.writes.read().map(|w| w.clone()).unwrap_or_default()
    }

    /// Current contents of a file as lossy UTF-8.
    pub fn contents(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        let key = store_key(path.as_ref().as_str());
        let files = self.files.read().ok()?;
        files
            .get(&key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl FileStore for MemoryFileStore {
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        let files = self
            .files
            .read()
            .map_err(|_| io::Error::other("memory store poisoned"))?;
        files
            .get(&store_key(path.as_str()))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    fn write(&self, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
        self.add_file(path, contents);
        if let Ok(mut writes) = self.writes.write() {
            writes.push(path.to_path_buf());
        }
        Ok(())
    }

    fn is_file(&self, path: &Utf8Path) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(&store_key(path.as_str())))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Utf8Path) -> bool {
        let key = store_key(path.as_str());
        if key.is_empty() {
            return false;
        }
        let prefix = format!("{key}/");

        let explicit = self
            .dirs
            .read()
            .map(|dirs| {
                dirs.iter()
                    .any(|d| d == &key || d.starts_with(&prefix))
            })
            .unwrap_or(false);

        explicit
            || self
                .files
                .read()
                .map(|files| files.keys().any(|f| f.starts_with(&prefix)))
                .unwrap_or(false)
    }
}

fn store_key(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_mixed_separators() {
        let store = MemoryFileStore::new().with_file(r"C:\Games\Foo\Game.exe", b"MZ");

        assert!(store.is_file(Utf8Path::new("c:/games/foo/game.exe")));
        assert!(store.is_dir(Utf8Path::new(r"C:\Games\Foo")));
        assert!(store.is_dir(Utf8Path::new("C:/Games/")));
        assert!(!store.is_dir(Utf8Path::new("C:/Games/Fo")));
        assert_eq!(
            store.read(Utf8Path::new("C:/Games/Foo/Game.exe")).unwrap(),
            b"MZ"
        );
    }

    #[test]
    fn test_memory_store_missing_file_is_not_found() {
        let store = MemoryFileStore::new();
        let err = store.read(Utf8Path::new("nope.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_store_records_writes() {
        let store = MemoryFileStore::new().with_dir("D:/Empty");
        store
            .write(Utf8Path::new("D:/Empty/a.ini"), b"[A]\n")
            .unwrap();

        assert!(store.is_dir(Utf8Path::new("D:/Empty")));
        assert_eq!(store.writes(), vec![Utf8PathBuf::from("D:/Empty/a.ini")]);
        assert_eq!(store.contents("d:/empty/A.INI").as_deref(), Some("[A]\n"));
    }

    #[test]
    fn test_os_store_round_trip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let file = dir.join("main.ini");

        OsFileStore.write(&file, b"x = 1").unwrap();

        assert!(OsFileStore.is_file(&file));
        assert!(OsFileStore.is_dir(&dir));
        assert_eq!(OsFileStore.read(&file).unwrap(), b"x = 1");
    }
}
