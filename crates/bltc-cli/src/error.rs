//! Error handling for the bltc CLI.
//!
//! Per-job failures never reach this module: the batch reports them and
//! folds them into the run status. What is left are failures that stop the
//! run before or around the batch:
//! - configuration that cannot be loaded
//! - setup of the working or output directory
//! - writing requested data (completions, configuration)

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use bltc_core::application::SetupError;
use bltc_core::domain::RunStatus;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI-level errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration file could not be read, parsed, or validated.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Setup failed before any job ran.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialise logging: {message}")]
    Logging { message: String },
}

impl CliError {
    /// Build a configuration error from a loader failure.
    pub fn config(err: anyhow::Error, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: format!("{err:#}"),
            path,
            source: Some(err.into()),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config { path, .. } => {
                let file = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| crate::config::AppConfig::config_path().display().to_string());
                vec![
                    format!("Check your config file at {file}"),
                    "Run 'bltc --print-config' to see the effective settings".into(),
                    "Environment overrides use BLTC__SECTION__KEY".into(),
                ]
            }

            Self::Setup(SetupError::OutputDirNotDirectory(path)) => vec![
                format!("'{}' exists and is not a directory", path.display()),
                "Choose another --output-dir".into(),
            ],

            Self::Setup(SetupError::OutputDirUnavailable(cause)) => {
                let mut out = cause.suggestions();
                out.push("Check that the parent of --output-dir is writable".into());
                out
            }

            Self::Setup(SetupError::WorkingDirectory(_)) => vec![
                "The current directory may have been removed".into(),
                "Run bltc from an existing directory".into(),
            ],

            Self::Io { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check that standard output is writable".into(),
            ],

            Self::Logging { .. } => vec!["Check the RUST_LOG syntax".into()],
        }
    }

    /// Get the error category for styling and log level.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::Configuration,
            Self::Setup(SetupError::OutputDirNotDirectory(_)) => ErrorCategory::UserError,
            Self::Setup(_) => ErrorCategory::Internal,
            Self::Io { .. } | Self::Logging { .. } => ErrorCategory::Internal,
        }
    }

    /// Run status this error ends the process with.
    pub fn status(&self) -> RunStatus {
        match self {
            Self::Setup(err) => err.status(),
            _ => RunStatus::UnexpectedError,
        }
    }

    /// Exit code to pass to the OS.
    pub fn exit_code(&self) -> u8 {
        self.status().code()
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!(code = self.exit_code(), "User error: {}", self),
            ErrorCategory::Configuration => {
                tracing::error!(code = self.exit_code(), "Configuration error: {}", self)
            }
            ErrorCategory::Internal => tracing::error!(code = self.exit_code(), "Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Something the user can fix on the command line.
    UserError,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert I/O results into [`CliError`] at call-sites
/// with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::Io {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bltc_core::error::BltcError;
    use std::io;

    fn denied() -> BltcError {
        BltcError::filesystem(
            "/ro/out",
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        )
    }

    #[test]
    fn setup_errors_exit_with_their_status() {
        assert_eq!(
            CliError::from(SetupError::OutputDirNotDirectory("/f".into())).exit_code(),
            5
        );
        assert_eq!(
            CliError::from(SetupError::OutputDirUnavailable(denied())).exit_code(),
            1
        );
    }

    #[test]
    fn config_error_exits_one_and_names_file() {
        let err = CliError::config(
            anyhow::anyhow!("expected a table"),
            Some("/etc/bltc.toml".into()),
        );
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.suggestions().iter().any(|s| s.contains("/etc/bltc.toml")));
    }

    #[test]
    fn unavailable_output_dir_keeps_cause_suggestions() {
        let err = CliError::from(SetupError::OutputDirUnavailable(denied()));
        assert!(err
            .suggestions()
            .iter()
            .any(|s| s.contains("Permission denied")));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::from(SetupError::OutputDirNotDirectory("/tmp/x".into()));
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::from(SetupError::OutputDirUnavailable(denied()));
        let s = err.format_plain(true);
        assert!(s.contains("Caused by:"));
        assert!(!s.contains("Use -v"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        let cli: CliResult<()> = result.with_cli_context(|| "writing completions");
        assert!(matches!(cli, Err(CliError::Io { ref message, .. }) if message == "writing completions"));
    }
}
