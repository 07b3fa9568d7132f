//! Application layer errors.
//!
//! [`JobError`] classifies a port failure by the stage it happened in. Its
//! [`JobError::status`] is the only place a failure becomes a
//! [`RunStatus`].

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::RunStatus;
use crate::error::BltcError;

/// A failure that ends one job (or one work item) but not the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JobError {
    /// The pattern matched nothing in any search directory.
    #[error("No files found matching '{pattern}' in {}", join(.search_paths))]
    NoInputMatch {
        pattern: String,
        search_paths: Vec<PathBuf>,
    },

    /// The input token is not a valid pattern.
    #[error("Invalid input pattern: {0}")]
    InvalidPattern(#[source] BltcError),

    /// The payload could not be acquired (file read, directory scan, stdin).
    #[error("Failed to read input{}", describe(.input.as_deref()))]
    Read {
        input: Option<PathBuf>,
        #[source]
        source: BltcError,
    },

    /// The destination could not be opened or flushed.
    #[error("Failed to write output {}", .output.display())]
    Write {
        output: PathBuf,
        #[source]
        source: BltcError,
    },

    /// The compiler rejected the payload.
    #[error("BLT error in {input}: {source}")]
    Transform {
        input: String,
        #[source]
        source: BltcError,
    },

    /// Anything else.
    #[error("Unexpected error while processing job: {0}")]
    Unexpected(#[source] BltcError),
}

fn join(paths: &[PathBuf]) -> String {
    let shown: Vec<_> = paths.iter().map(|p| p.display().to_string()).collect();
    shown.join(", ")
}

fn describe(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}

impl JobError {
    /// Severity this failure contributes to the run.
    pub fn status(&self) -> RunStatus {
        match self {
            Self::NoInputMatch { .. } => RunStatus::NoInputMatch,
            Self::InvalidPattern(_) => RunStatus::ArgumentError,
            Self::Read { .. } => RunStatus::ReadError,
            Self::Write { .. } => RunStatus::WriteError,
            Self::Transform { .. } => RunStatus::TransformError,
            Self::Unexpected(_) => RunStatus::UnexpectedError,
        }
    }

    /// The path the failure is about, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { input, source } => input.as_deref().or_else(|| source.path()),
            Self::Write { output, .. } => Some(output),
            Self::Unexpected(source) => source.path(),
            _ => None,
        }
    }

    /// The port error underneath, if any.
    pub fn cause(&self) -> Option<&BltcError> {
        match self {
            Self::NoInputMatch { .. } => None,
            Self::InvalidPattern(source) | Self::Unexpected(source) => Some(source),
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Transform { source, .. } => Some(source),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoInputMatch { search_paths, .. } => vec![
                format!("Searched: {}", join(search_paths)),
                "Add search paths with --input-dir".into(),
            ],
            Self::Write { output, .. } => vec![
                format!("Failed to open: {}", output.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            other => other.cause().map(BltcError::suggestions).unwrap_or_default(),
        }
    }
}

/// A failure during setup, before any job runs. Stops the whole run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SetupError {
    /// The working directory could not be determined.
    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[source] BltcError),

    /// The output directory did not exist and could not be created.
    #[error("Filesystem error while configuring output path: {0}")]
    OutputDirUnavailable(#[source] BltcError),

    /// The output path exists but is not a directory.
    #[error("Output path is not a directory: {}", .0.display())]
    OutputDirNotDirectory(PathBuf),
}

impl SetupError {
    pub fn status(&self) -> RunStatus {
        match self {
            Self::WorkingDirectory(_) | Self::OutputDirUnavailable(_) => {
                RunStatus::UnexpectedError
            }
            Self::OutputDirNotDirectory(_) => RunStatus::WriteError,
        }
    }
}
