//! Unified error handling for bltc core.
//!
//! [`BltcError`] is what ports and adapters return. It says *what* went
//! wrong; the job boundary (see [`crate::application::JobError`]) decides how
//! severe it is for the run.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root error type for port operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BltcError {
    /// A filesystem primitive failed (read, enumerate, open, create).
    #[error("Filesystem error at {}: {reason}", path.display())]
    Filesystem {
        path: PathBuf,
        kind: io::ErrorKind,
        reason: String,
    },

    /// An input token could not be compiled into a glob pattern.
    #[error("Invalid input pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The template compiler rejected its input.
    #[error("{message}")]
    Transform { message: String },

    /// A stream (stdin, compiler pipe) failed.
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl BltcError {
    /// Build a [`BltcError::Filesystem`] from an `io::Error`.
    pub fn filesystem(path: impl AsRef<Path>, err: &io::Error) -> Self {
        Self::Filesystem {
            path: path.as_ref().to_path_buf(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Filesystem { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Underlying OS error kind, if the error came from an I/O call.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Filesystem { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { path, kind, .. } => match kind {
                io::ErrorKind::NotFound => vec![
                    format!("'{}' does not exist", path.display()),
                    "Check the spelling or add a search path with --input-dir".into(),
                ],
                io::ErrorKind::PermissionDenied => vec![
                    format!("Permission denied for '{}'", path.display()),
                    "Check file permissions".into(),
                ],
                _ => vec![format!("Failed to access: {}", path.display())],
            },
            Self::InvalidPattern { .. } => vec![
                "Supported wildcards: *, ?, [abc], ** (recursive)".into(),
                "Quote patterns so your shell does not expand them".into(),
            ],
            Self::Transform { .. } => vec!["Fix the template error reported above".into()],
            Self::Io { .. } => vec!["Check that the input stream is readable".into()],
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in bltc".into()],
        }
    }
}

/// Convenient result type alias.
pub type BltcResult<T> = Result<T, BltcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_error_keeps_kind_and_path() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = BltcError::filesystem("/tmp/x.blt", &io_err);

        assert_eq!(err.path(), Some(Path::new("/tmp/x.blt")));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().contains("/tmp/x.blt"));
    }

    #[test]
    fn transform_error_displays_message_verbatim() {
        let err = BltcError::Transform {
            message: "unexpected '`' at 3:14".into(),
        };
        assert_eq!(err.to_string(), "unexpected '`' at 3:14");
        assert_eq!(err.path(), None);
    }

    #[test]
    fn not_found_suggests_input_dir() {
        let err = BltcError::filesystem(
            "missing.blt",
            &io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.suggestions().iter().any(|s| s.contains("--input-dir")));
    }
}
