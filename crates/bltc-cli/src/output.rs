//! Output management and formatting.
//!
//! Human-facing messages go to stderr. Stdout is reserved for compiled
//! templates and for data the user asked for (completions, configuration).

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;

use bltc_core::application::RunSummary;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    data: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stderr().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stderr(),
            data: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Requested data, written to stdout verbatim.
    pub fn data(&self, text: &str) -> io::Result<()> {
        self.data.write_str(text)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// End-of-run summary line, or a JSON object with `--output-format json`.
    pub fn summary(&self, summary: &RunSummary) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            let json = serde_json::to_string(summary).map_err(io::Error::other)?;
            return self.term.write_line(&json);
        }

        let total = summary.items_succeeded + summary.items_failed;
        if summary.status.is_ok() {
            self.success(&format!(
                "Compiled {} template{}",
                summary.items_succeeded,
                plural(summary.items_succeeded)
            ))
        } else if summary.items_failed > 0 {
            self.error(&format!(
                "{} of {} template{} failed ({}, exit {})",
                summary.items_failed,
                total,
                plural(total),
                summary.status,
                summary.exit_code
            ))
        } else {
            self.warning(&format!(
                "Compiled {} template{} with problems ({}, exit {})",
                summary.items_succeeded,
                plural(summary.items_succeeded),
                summary.status,
                summary.exit_code
            ))
        }
    }

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bltc_core::domain::RunStatus;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: false,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn summary(status: RunStatus, ok: usize, failed: usize) -> RunSummary {
        RunSummary {
            status,
            exit_code: status.code(),
            jobs: 1,
            items_succeeded: ok,
            items_failed: failed,
        }
    }

    #[test]
    fn plain_format_disables_color() {
        assert!(!make_manager(false, OutputFormat::Plain).supports_color());
        assert!(make_manager(false, OutputFormat::Human).supports_color());
    }

    #[test]
    fn config_no_color_is_honoured() {
        let mut config = AppConfig::default();
        config.output.no_color = true;
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            output_format: OutputFormat::Human,
        };
        assert!(!OutputManager::new(&args, &config).supports_color());
    }

    #[test]
    fn summaries_write_in_every_format() {
        for format in [OutputFormat::Plain, OutputFormat::Json] {
            let out = make_manager(false, format);
            assert!(out.summary(&summary(RunStatus::Ok, 2, 0)).is_ok());
            assert!(out
                .summary(&summary(RunStatus::TransformError, 1, 1))
                .is_ok());
            assert!(out.summary(&summary(RunStatus::NoInputMatch, 1, 0)).is_ok());
        }
    }

    #[test]
    fn summary_json_shape() {
        let json = serde_json::to_value(summary(RunStatus::WriteError, 3, 1)).unwrap();
        assert_eq!(json["exit_code"], 5);
        assert_eq!(json["items_succeeded"], 3);
        assert_eq!(json["status"], "write_error");
    }

    #[test]
    fn plural_suffix() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(2), "s");
    }
}
