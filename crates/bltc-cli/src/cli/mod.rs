//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  The order in which job options were given is
//! recovered separately from the raw matches (see `crate::jobs`).

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use bltc_core::domain::RunStatus;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Argument ids (field names) shared with the job builder ───────────────────

pub const ARG_INPUTS: &str = "inputs";
pub const ARG_OUTPUT: &str = "output";
pub const ARG_STDOUT: &str = "stdout";
pub const ARG_INPUT: &str = "input";
pub const ARG_STDIN: &str = "stdin";

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "bltc",
    bin_name = "bltc",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "BLT template compiler",
    long_about = "Compiles BLT templates into Lua. Inputs are filenames or glob \
                  patterns searched in every --input-dir; -o, --stdout, -I and \
                  --stdin apply to the input that follows them.",
    after_help = exit_codes_help(),
)]
pub struct Cli {
    /// Template files or glob patterns.
    #[arg(
        value_name = "INPUT",
        help = "Template files or glob patterns to compile"
    )]
    pub inputs: Vec<String>,

    /// Destination of the next input.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        action = ArgAction::Append,
        help = "Write the next input to PATH"
    )]
    pub output: Vec<String>,

    /// Send the next input to standard output.
    ///
    /// Stored as one (empty) value per occurrence so its position among the
    /// other job options can be recovered.
    #[arg(
        long = "stdout",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "",
        action = ArgAction::Append,
        help = "Write the next input to standard output"
    )]
    pub stdout: Vec<String>,

    /// Inline template text.
    #[arg(
        short = 'I',
        long = "input",
        value_name = "STRING",
        action = ArgAction::Append,
        help = "Compile STRING as a template (to stdout unless -o precedes it)"
    )]
    pub input: Vec<String>,

    /// Compile standard input.
    #[arg(
        long = "stdin",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "",
        action = ArgAction::Append,
        help = "Compile standard input (to stdout unless -o precedes it)"
    )]
    pub stdin: Vec<String>,

    /// Search directories for inputs.
    #[arg(
        short = 'D',
        long = "input-dir",
        value_name = "PATH",
        action = ArgAction::Append,
        help = "Search PATH for inputs (repeatable; ';' or ':' separated)"
    )]
    pub input_dirs: Vec<String>,

    /// Output directory for every input.
    #[arg(
        short = 'd',
        long = "output-dir",
        value_name = "PATH",
        help = "Write outputs below PATH"
    )]
    pub output_dir: Option<PathBuf>,

    /// Emit the compiler's trace form instead of compiled output.
    #[arg(long = "debug", help = "Output parse trees instead of compiled Lua")]
    pub debug: bool,

    /// Print shell completions and exit.
    #[arg(
        long = "completions",
        value_name = "SHELL",
        value_enum,
        help = "Generate shell completions"
    )]
    pub completions: Option<Shell>,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config", help = "Print the effective configuration as TOML")]
    pub print_config: bool,

    /// Logging, color and configuration flags.
    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Cli {
    /// `-D` values split into individual directories.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.input_dirs
            .iter()
            .flat_map(|raw| split_search_paths(raw))
            .collect()
    }
}

/// Split one `-D` value on `;` and, except on Windows, `:`.
pub fn split_search_paths(raw: &str) -> Vec<PathBuf> {
    let is_separator = |c: char| c == ';' || (!cfg!(windows) && c == ':');
    raw.split(is_separator)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn exit_codes_help() -> String {
    let mut help = String::from("EXIT STATUS:\n");
    for status in RunStatus::ALL {
        help.push_str(&format!("  {}  {}\n", status.code(), status.description()));
    }
    help.push_str(
        "\nEXAMPLES:\n\
         \x20 bltc views/*.blt\n\
         \x20 bltc -D templates -d out/ index.blt\n\
         \x20 bltc -o page.lua page.blt --stdout debug.blt\n\
         \x20 echo '`= 1 + 1`' | bltc --stdin",
    );
    help
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
