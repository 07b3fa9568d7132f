//! Input path resolution.
//!
//! Turns one input token into concrete files:
//! 1. An absolute path that exists is returned as-is, search paths unused.
//! 2. Otherwise the token is globbed under every search path, in order.
//! 3. Results keep directory precedence, then lexical order, first
//!    occurrence wins on duplicates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{instrument, trace, warn};

use crate::{
    application::ports::{Filesystem, MatchKind},
    domain::ResolvedSource,
    error::{BltcError, BltcResult},
};

/// Result of resolving one token.
///
/// A directory that cannot be enumerated contributes a failure instead of
/// matches; the other directories are still searched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolution {
    pub matches: Vec<ResolvedSource>,
    pub failures: Vec<BltcError>,
}

/// Resolves path/glob tokens against ordered search directories.
#[derive(Clone)]
pub struct PathResolver {
    filesystem: Arc<dyn Filesystem>,
}

impl PathResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Resolve `token` against `search_paths`.
    ///
    /// Only a malformed pattern is an `Err`; no match is an empty
    /// [`Resolution`].
    #[instrument(skip(self, search_paths), fields(dirs = search_paths.len()))]
    pub fn resolve(
        &self,
        token: &str,
        search_paths: &[PathBuf],
        kind: MatchKind,
    ) -> BltcResult<Resolution> {
        let candidate = Path::new(token);
        if candidate.is_absolute() && self.filesystem.exists(candidate) {
            trace!("Absolute input exists, skipping search paths");
            return Ok(Resolution {
                matches: vec![ResolvedSource::absolute(candidate.to_path_buf())],
                failures: Vec::new(),
            });
        }

        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();

        for dir in search_paths {
            match self.filesystem.glob(dir, token, kind) {
                Ok(paths) => {
                    trace!(dir = %dir.display(), count = paths.len(), "Search path scanned");
                    for path in paths {
                        if seen.insert(path.clone()) {
                            resolution.matches.push(ResolvedSource::under(dir, path));
                        }
                    }
                }
                Err(err @ BltcError::InvalidPattern { .. }) => return Err(err),
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "Failed to search directory");
                    resolution.failures.push(err);
                }
            }
        }

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use mockall::predicate::*;
    use std::io;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    fn full_paths(res: &Resolution) -> Vec<PathBuf> {
        res.matches.iter().map(|m| m.path.clone()).collect()
    }

    #[test]
    fn absolute_existing_path_short_circuits() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .with(eq(PathBuf::from("/abs/foo.blt")))
            .return_const(true);
        fs.expect_glob().never();

        let resolver = PathResolver::new(Arc::new(fs));
        let res = resolver
            .resolve("/abs/foo.blt", &paths(&["/a", "/b"]), MatchKind::FilesAndMisc)
            .unwrap();

        assert_eq!(full_paths(&res), paths(&["/abs/foo.blt"]));
        assert_eq!(res.matches[0].relative, PathBuf::from("foo.blt"));
    }

    #[test]
    fn absolute_missing_path_falls_back_to_glob() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob().times(1).returning(|_, _, _| Ok(vec![]));

        let resolver = PathResolver::new(Arc::new(fs));
        let res = resolver
            .resolve("/abs/missing.blt", &paths(&["/w"]), MatchKind::FilesAndMisc)
            .unwrap();
        assert!(res.matches.is_empty());
        assert!(res.failures.is_empty());
    }

    #[test]
    fn directory_precedence_then_dedup() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob()
            .with(eq(PathBuf::from("/second")), eq("*.blt"), always())
            .returning(|_, _, _| Ok(paths(&["/second/a.blt", "/shared/z.blt"])));
        fs.expect_glob()
            .with(eq(PathBuf::from("/first")), eq("*.blt"), always())
            .returning(|_, _, _| Ok(paths(&["/first/b.blt", "/shared/z.blt"])));

        let resolver = PathResolver::new(Arc::new(fs));
        let res = resolver
            .resolve("*.blt", &paths(&["/first", "/second"]), MatchKind::FilesAndMisc)
            .unwrap();

        assert_eq!(
            full_paths(&res),
            paths(&["/first/b.blt", "/shared/z.blt", "/second/a.blt"])
        );
    }

    #[test]
    fn enumeration_failure_skips_only_that_directory() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob()
            .with(eq(PathBuf::from("/locked")), always(), always())
            .returning(|dir, _, _| {
                Err(BltcError::filesystem(
                    dir,
                    &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                ))
            });
        fs.expect_glob()
            .with(eq(PathBuf::from("/open")), always(), always())
            .returning(|_, _, _| Ok(paths(&["/open/x.blt"])));

        let resolver = PathResolver::new(Arc::new(fs));
        let res = resolver
            .resolve("x.blt", &paths(&["/locked", "/open"]), MatchKind::FilesAndMisc)
            .unwrap();

        assert_eq!(full_paths(&res), paths(&["/open/x.blt"]));
        assert_eq!(res.failures.len(), 1);
        assert_eq!(res.failures[0].path(), Some(Path::new("/locked")));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob().returning(|_, pattern, _| {
            Err(BltcError::InvalidPattern {
                pattern: pattern.into(),
                reason: "unclosed [".into(),
            })
        });

        let resolver = PathResolver::new(Arc::new(fs));
        let err = resolver
            .resolve("[oops", &paths(&["/w"]), MatchKind::FilesAndMisc)
            .unwrap_err();
        assert!(matches!(err, BltcError::InvalidPattern { .. }));
    }

    #[test]
    fn relative_paths_are_recorded_per_search_dir() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob()
            .returning(|_, _, _| Ok(paths(&["/w/views/a.blt"])));

        let resolver = PathResolver::new(Arc::new(fs));
        let res = resolver
            .resolve("**/*.blt", &paths(&["/w"]), MatchKind::Files)
            .unwrap();
        assert_eq!(res.matches[0].relative, PathBuf::from("views/a.blt"));
    }
}
