//! Compiler adapter that pipes templates through an external process.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, instrument};

use bltc_core::{
    application::ports::Transform,
    error::{BltcError, BltcResult},
};

/// Compiler program used when none is configured.
pub const DEFAULT_COMPILER: &str = "bltcc";

/// Arguments appended in debug mode unless configured otherwise.
pub const DEFAULT_DEBUG_ARGS: &[&str] = &["--debug"];

/// Runs a compiler process per template.
///
/// The template goes to the child's stdin and its stdout is copied to the
/// sink. A non-zero exit is a transform error carrying the child's stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTransform {
    program: String,
    args: Vec<String>,
    debug_args: Vec<String>,
}

impl CommandTransform {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            debug_args: DEFAULT_DEBUG_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.debug_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, debug: bool) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if debug {
            cmd.args(&self.debug_args);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for CommandTransform {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER)
    }
}

impl Transform for CommandTransform {
    #[instrument(skip_all, fields(program = %self.program, bytes = input.len(), debug_mode = debug_mode))]
    fn transform(&self, input: &[u8], sink: &mut dyn Write, debug_mode: bool) -> BltcResult<()> {
        let mut child = self
            .command(debug_mode)
            .spawn()
            .map_err(|e| BltcError::Configuration {
                message: format!("Failed to start compiler '{}': {}", self.program, e),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| BltcError::Internal {
            message: "compiler stdin was not piped".into(),
        })?;

        // Feed stdin from another thread so a chatty child cannot fill its
        // stdout pipe and block while we are still writing.
        let output = thread::scope(|scope| {
            let feeder = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            // A child that exits without reading everything closes the pipe
            // early; its exit status says what went wrong.
            let _ = feeder.join();
            output
        })
        .map_err(|e| BltcError::Io {
            reason: format!("Failed to run compiler '{}': {}", self.program, e),
        })?;

        sink.write_all(&output.stdout).map_err(|e| BltcError::Io {
            reason: e.to_string(),
        })?;

        if output.status.success() {
            debug!(bytes = output.stdout.len(), "Compiler finished");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("{} exited with {}", self.program, output.status)
        } else {
            stderr
        };
        Err(BltcError::Transform { message })
    }
}
