//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use glob::{MatchOptions, Pattern};

use bltc_core::{
    application::ports::{Filesystem, MatchKind},
    error::{BltcError, BltcResult},
};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can keep a handle and inspect
/// what a service wrote.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    /// Paths that fail to read or enumerate with `PermissionDenied`.
    denied: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> &Self {
        let path = path.as_ref();
        let mut inner = self.inner.write().unwrap();
        if let Some(parent) = path.parent() {
            insert_ancestors(&mut inner.directories, parent);
        }
        inner.files.insert(path.to_path_buf(), content.into());
        self
    }

    /// Add an empty directory and its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        let mut inner = self.inner.write().unwrap();
        insert_ancestors(&mut inner.directories, path.as_ref());
        self
    }

    /// Make reads and enumeration of `path` fail.
    pub fn deny(&self, path: impl AsRef<Path>) -> &Self {
        let mut inner = self.inner.write().unwrap();
        inner.denied.insert(path.as_ref().to_path_buf());
        self
    }

    /// Read a file's content (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_ancestors(dirs: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        dirs.insert(current.clone());
    }
}

fn lock_error() -> BltcError {
    BltcError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn denied(path: &Path) -> BltcError {
    BltcError::filesystem(
        path,
        &io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
    )
}

impl Filesystem for MemoryFilesystem {
    fn read_file(&self, path: &Path) -> BltcResult<Vec<u8>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        if inner.denied.contains(path) {
            return Err(denied(path));
        }
        inner.files.get(path).cloned().ok_or_else(|| {
            BltcError::filesystem(path, &io::Error::new(io::ErrorKind::NotFound, "not found"))
        })
    }

    fn glob(&self, dir: &Path, pattern: &str, _kind: MatchKind) -> BltcResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| lock_error())?;
        if inner.denied.contains(dir) {
            return Err(denied(dir));
        }

        let compiled = Pattern::new(pattern).map_err(|e| BltcError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;
        let absolute = Path::new(pattern).is_absolute();

        // Only regular files are stored, so both match kinds agree.
        let mut matches: Vec<PathBuf> = inner
            .files
            .keys()
            .filter(|path| {
                if absolute {
                    compiled.matches_path_with(path, MATCH_OPTIONS)
                } else {
                    path.strip_prefix(dir)
                        .map(|rel| compiled.matches_path_with(rel, MATCH_OPTIONS))
                        .unwrap_or(false)
                }
            })
            .cloned()
            .collect();
        matches.sort();
        Ok(matches)
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.directories.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> BltcResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;
        if inner.files.contains_key(path) {
            return Err(BltcError::filesystem(
                path,
                &io::Error::new(io::ErrorKind::AlreadyExists, "file exists"),
            ));
        }
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn create_file(&self, path: &Path) -> BltcResult<Box<dyn Write + Send>> {
        let mut inner = self.inner.write().map_err(|_| lock_error())?;

        // No intermediate directories are created.
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(BltcError::filesystem(
                    path,
                    &io::Error::new(io::ErrorKind::NotFound, "parent directory does not exist"),
                ));
            }
        }
        if inner.directories.contains(path) {
            return Err(BltcError::filesystem(
                path,
                &io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
            ));
        }

        inner.files.insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MemoryFile {
            inner: Arc::clone(&self.inner),
            path: path.to_path_buf(),
        }))
    }
}

/// Writer that appends straight into the shared file map.
struct MemoryFile {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
    path: PathBuf,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| io::Error::other("memory filesystem lock poisoned"))?;
        inner
            .files
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_is_relative_to_dir_and_sorted() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/w/b.blt", "b")
            .add_file("/w/a.blt", "a")
            .add_file("/w/sub/c.blt", "c")
            .add_file("/other/d.blt", "d");

        let found = fs.glob(Path::new("/w"), "*.blt", MatchKind::Files).unwrap();
        assert_eq!(found, vec![PathBuf::from("/w/a.blt"), PathBuf::from("/w/b.blt")]);

        let deep = fs
            .glob(Path::new("/w"), "**/*.blt", MatchKind::Files)
            .unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn denied_dir_fails_to_enumerate() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/locked").deny("/locked");
        let err = fs
            .glob(Path::new("/locked"), "*", MatchKind::Files)
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn create_file_truncates_and_shares_contents() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/w/out.lua", "old");

        let handle = fs.clone();
        let mut w = fs.create_file(Path::new("/w/out.lua")).unwrap();
        w.write_all(b"new").unwrap();
        assert_eq!(handle.contents("/w/out.lua").unwrap(), b"new");
    }

    #[test]
    fn create_file_needs_parent() {
        let fs = MemoryFilesystem::new();
        let err = fs.create_file(Path::new("/nope/out.lua")).err().unwrap();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
    }
}
