//! # bltc
//!
//! Batch compiler for BLT templates.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Answer `--completions` / `--print-config`, or build the job list.
//! 6. Run the batch and exit with its status.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! |  0   | Success                                   |
//! |  1   | Unexpected error, or nothing to compile   |
//! |  2   | Invalid arguments                         |
//! |  3   | An input matched no file                  |
//! |  4   | An input could not be read                |
//! |  5   | An output could not be written            |
//! |  6   | The compiler rejected a template          |

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use clap_complete::{generate, shells};
use tracing::{debug, info, instrument, warn};

use bltc_adapters::{CommandTransform, LocalFilesystem, StdinSource};
use bltc_core::application::{BatchOptions, BatchPorts, BatchService, MatchKind, RunSummary};
use bltc_core::domain::RunStatus;

use crate::{
    cli::{Cli, Shell},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod config;
mod error;
mod jobs;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    // Job order is rebuilt from the raw matches, so keep them.
    let matches = match Cli::command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => return clap_exit(e),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => return clap_exit(e),
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        let err = CliError::Logging {
            message: format!("{e:#}"),
        };
        eprint!("{}", err.format_plain(false));
        return ExitCode::from(err.exit_code());
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let output = OutputManager::new(&cli.global, &AppConfig::default());
            return handle_error(CliError::config(e, cli.global.config.clone()), &cli, &output);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5/6. Dispatch + error handling ────────────────────────────────────
    match run(&cli, &matches, config, &output) {
        Ok(status) => {
            info!(code = status.code(), "bltc finished: {status}");
            ExitCode::from(status.code())
        }
        Err(e) => handle_error(e, &cli, &output),
    }
}

#[instrument(skip_all)]
fn run(
    cli: &Cli,
    matches: &clap::ArgMatches,
    config: AppConfig,
    output: &OutputManager,
) -> CliResult<RunStatus> {
    if let Some(shell) = cli.completions {
        output
            .data(&completions(shell))
            .with_cli_context(|| "Failed to write completions")?;
        return Ok(RunStatus::Ok);
    }

    if cli.print_config {
        let rendered = config
            .to_toml()
            .map_err(|e| CliError::config(e, cli.global.config.clone()))?;
        output
            .data(&rendered)
            .with_cli_context(|| "Failed to write configuration")?;
        return Ok(RunStatus::Ok);
    }

    let jobs = jobs::build_jobs(matches);
    if jobs.is_empty() {
        let help = Cli::command().render_help();
        eprintln!("{help}");
        return Ok(RunStatus::UnexpectedError);
    }

    let mut search_paths = cli.search_paths();
    search_paths.extend(config.search.input_dirs.iter().cloned());

    let options = BatchOptions {
        search_paths,
        output_dir: cli.output_dir.clone(),
        working_dir: None,
        extension: config.output.extension.clone(),
        debug: cli.debug,
        match_kind: MatchKind::default(),
    };

    let transform = CommandTransform::new(config.compiler.program.clone())
        .with_args(config.compiler.args.iter().cloned())
        .with_debug_args(config.compiler.debug_args.iter().cloned());
    debug!(compiler = transform.program(), debug_mode = cli.debug, "Using compiler");

    let ports = BatchPorts {
        filesystem: Arc::new(LocalFilesystem::new()),
        transform: Arc::new(transform),
        input: Box::new(StdinSource::new()),
        stdout: Box::new(io::stdout()),
    };

    let service = BatchService::new(ports, options)?;
    let summary = service.run(&jobs);

    let shown = output
        .summary(&summary)
        .with_cli_context(|| "Failed to write summary");
    Ok(batch_status(&summary, shown))
}

/// The batch status wins over a failed summary line.
fn batch_status(summary: &RunSummary, shown: CliResult<()>) -> RunStatus {
    if let Err(e) = shown {
        warn!(error = %e, "Summary not shown");
    }
    summary.status
}

fn completions(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, "bltc", &mut buf),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, "bltc", &mut buf),
        Shell::Fish => generate(shells::Fish, &mut cmd, "bltc", &mut buf),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "bltc", &mut buf),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, "bltc", &mut buf),
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Print a clap error; help and version exit 0, everything else 2.
fn clap_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    ExitCode::from(err.exit_code().clamp(0, u8::MAX as i32) as u8)
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, cli: &Cli, output: &OutputManager) -> ExitCode {
    err.log();

    let verbose = cli.global.verbose > 0;
    let msg = if output.supports_color() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
