//! Job specifications and the work items they expand into.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// How a job's `source` string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Filename or glob pattern, resolved against the search paths.
    Path,
    /// Literal template text.
    Raw,
    /// The captured standard input, shared by every console job.
    Console,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Raw => write!(f, "raw"),
            Self::Console => write!(f, "stdin"),
        }
    }
}

/// Where a job's output goes, as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DestKind {
    #[default]
    Path,
    Console,
}

/// One caller-declared unit of work, before filesystem expansion.
///
/// Fields are private: a spec is fixed at construction, and global settings
/// such as the output directory are applied while planning, never written
/// back into the spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    source: String,
    source_kind: SourceKind,
    dest: String,
    dest_kind: DestKind,
}

impl JobSpec {
    pub fn new(
        source: impl Into<String>,
        source_kind: SourceKind,
        dest: impl Into<String>,
        dest_kind: DestKind,
    ) -> Self {
        Self {
            source: source.into(),
            source_kind,
            dest: dest.into(),
            dest_kind,
        }
    }

    /// A path/glob job with the default destination.
    pub fn path(pattern: impl Into<String>) -> Self {
        Self::new(pattern, SourceKind::Path, String::new(), DestKind::Path)
    }

    /// A raw template job with the default destination.
    pub fn raw(template: impl Into<String>) -> Self {
        Self::new(template, SourceKind::Raw, String::new(), DestKind::Path)
    }

    /// A stdin job with the default destination.
    pub fn console() -> Self {
        Self::new(String::new(), SourceKind::Console, String::new(), DestKind::Path)
    }

    /// Same source, explicit destination file.
    pub fn with_dest(self, dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            dest_kind: DestKind::Path,
            ..self
        }
    }

    /// Same source, forced to standard output.
    pub fn to_console(self) -> Self {
        Self {
            dest_kind: DestKind::Console,
            ..self
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn dest_kind(&self) -> DestKind {
        self.dest_kind
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source_kind {
            SourceKind::Path => write!(f, "{}", self.source),
            SourceKind::Raw => write!(f, "<inline template>"),
            SourceKind::Console => write!(f, "<stdin>"),
        }
    }
}

/// A concrete file found by the path resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Full path of the match.
    pub path: PathBuf,
    /// Path relative to the search directory it was found in.
    pub relative: PathBuf,
}

impl ResolvedSource {
    /// A match found under `root`.
    ///
    /// Falls back to the file name when `path` is not below `root`.
    pub fn under(root: &Path, path: PathBuf) -> Self {
        let relative = match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => file_name_of(&path),
        };
        Self { path, relative }
    }

    /// A match that was given as an absolute path.
    ///
    /// Its relative form is just the file name, so with an output directory
    /// the output lands at `output_dir/<file name>` instead of beside the
    /// source.
    pub fn absolute(path: PathBuf) -> Self {
        let relative = file_name_of(&path);
        Self { path, relative }
    }
}

fn file_name_of(path: &Path) -> PathBuf {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| path.to_path_buf())
}

/// What the destination planner knows about the source.
#[derive(Debug, Clone, Copy)]
pub enum SourceIdentity<'a> {
    Path(&'a ResolvedSource),
    NonPath,
}

/// Where a work item's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    FileAt(PathBuf),
    Literal(String),
    SharedConsoleCapture,
}

/// Final destination of a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationPlan {
    File(PathBuf),
    Console,
}

impl DestinationPlan {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Console => None,
        }
    }
}

impl fmt::Display for DestinationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Console => write!(f, "<stdout>"),
        }
    }
}

/// One fully resolved source → destination unit, consumed once by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub payload: PayloadSource,
    pub destination: DestinationPlan,
}

impl WorkItem {
    pub fn resolved_source_path(&self) -> Option<&Path> {
        match &self.payload {
            PayloadSource::FileAt(path) => Some(path),
            _ => None,
        }
    }

    pub fn resolved_dest_path(&self) -> Option<&Path> {
        self.destination.path()
    }
}
