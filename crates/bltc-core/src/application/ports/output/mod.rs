//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `bltc-adapters` crate provides implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::BltcResult;

/// Which filesystem entries a glob may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchKind {
    /// Regular files only.
    Files,
    /// Anything that is not a directory (files, fifos, devices, ...).
    #[default]
    FilesAndMisc,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `bltc_adapters::filesystem::LocalFilesystem` (production)
/// - `bltc_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> BltcResult<Vec<u8>>;

    /// Expand `pattern` below `dir`.
    ///
    /// Matches come back in lexical order. "No match" is `Ok(vec![])`; an
    /// error means the directory could not be enumerated or the pattern is
    /// malformed.
    fn glob(&self, dir: &Path, pattern: &str, kind: MatchKind) -> BltcResult<Vec<PathBuf>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BltcResult<()>;

    /// Open `path` for writing, creating or truncating it.
    ///
    /// Parent directories are not created.
    fn create_file(&self, path: &Path) -> BltcResult<Box<dyn Write + Send>>;
}

/// Port for the template compiler.
pub trait Transform: Send + Sync {
    /// Compile `input` into `sink`.
    ///
    /// With `debug` set the compiler emits its trace form (parse trees)
    /// instead of compiled output. Failures are reported as
    /// [`crate::error::BltcError::Transform`]; the sink may hold partial
    /// output by then.
    fn transform(&self, input: &[u8], sink: &mut dyn Write, debug: bool) -> BltcResult<()>;
}

/// Port for the standard input stream.
#[cfg_attr(test, mockall::automock)]
pub trait InputSource: Send + Sync {
    /// Read to end of stream.
    fn read_all(&self) -> BltcResult<Vec<u8>>;
}
