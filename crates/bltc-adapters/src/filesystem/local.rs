//! Local filesystem adapter using std::fs and the `glob` crate.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{trace, warn};

use bltc_core::{
    application::ports::{Filesystem, MatchKind},
    error::{BltcError, BltcResult},
};

/// `*` and `?` stay inside one path component; `**` recurses.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_file(&self, path: &Path) -> BltcResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn glob(&self, dir: &Path, pattern: &str, kind: MatchKind) -> BltcResult<Vec<PathBuf>> {
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            // A search dir that is missing altogether has nothing to match.
            match fs::read_dir(dir) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    trace!(dir = %dir.display(), "Search path does not exist");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(map_io_error(dir, e, "read directory")),
            }
            let dir = dir.to_str().ok_or_else(|| BltcError::Filesystem {
                path: dir.to_path_buf(),
                kind: io::ErrorKind::InvalidData,
                reason: "Search path is not valid UTF-8".into(),
            })?;
            format!("{}/{}", Pattern::escape(dir.trim_end_matches('/')), pattern)
        };

        let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| {
            BltcError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.msg.to_string(),
            }
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if accepts(&path, kind) => matches.push(path),
                Ok(path) => trace!(path = %path.display(), "Skipping non-file match"),
                Err(e) => warn!(
                    path = %e.path().display(),
                    error = %e.error(),
                    "Skipping unreadable entry"
                ),
            }
        }
        matches.sort();
        Ok(matches)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> BltcResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_file(&self, path: &Path) -> BltcResult<Box<dyn Write + Send>> {
        let file = File::create(path).map_err(|e| map_io_error(path, e, "create file"))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn accepts(path: &Path, kind: MatchKind) -> bool {
    match fs::metadata(path) {
        Ok(meta) => match kind {
            MatchKind::Files => meta.is_file(),
            MatchKind::FilesAndMisc => !meta.is_dir(),
        },
        Err(_) => false,
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BltcError {
    BltcError::Filesystem {
        path: path.to_path_buf(),
        kind: e.kind(),
        reason: format!("Failed to {}: {}", operation, e),
    }
}
