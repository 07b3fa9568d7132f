//! Builds the ordered job list from parsed arguments.
//!
//! `-o` and `--stdout` only affect the input that follows them, so the
//! relative order of job options matters. Clap records the position of
//! every value; replaying them in that order rebuilds the sequence the user
//! typed.

use clap::ArgMatches;
use tracing::{debug, warn};

use bltc_core::domain::{DestKind, JobSpec, SourceKind};

use crate::cli::{ARG_INPUT, ARG_INPUTS, ARG_OUTPUT, ARG_STDIN, ARG_STDOUT};

/// One job-related token, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Output(String),
    Stdout,
    Path(String),
    Raw(String),
    Stdin,
}

/// Pending destination, consumed by the next input.
#[derive(Debug, Default)]
struct Pending {
    dest: String,
    dest_kind: DestKind,
}

impl Pending {
    fn take(&mut self) -> (String, DestKind) {
        let Pending { dest, dest_kind } = std::mem::take(self);
        (dest, dest_kind)
    }
}

/// Replay the job options in the order they were given.
pub fn build_jobs(matches: &ArgMatches) -> Vec<JobSpec> {
    let mut jobs = Vec::new();
    let mut pending = Pending::default();

    for token in tokens(matches) {
        match token {
            Token::Output(dest) => {
                pending.dest = dest;
                pending.dest_kind = DestKind::Path;
            }
            Token::Stdout => {
                pending.dest.clear();
                pending.dest_kind = DestKind::Console;
            }
            Token::Path(pattern) => {
                let (dest, dest_kind) = pending.take();
                jobs.push(JobSpec::new(pattern, SourceKind::Path, dest, dest_kind));
            }
            Token::Raw(template) => {
                let (dest, dest_kind) = console_unless_redirected(pending.take());
                jobs.push(JobSpec::new(template, SourceKind::Raw, dest, dest_kind));
            }
            Token::Stdin => {
                let (dest, dest_kind) = console_unless_redirected(pending.take());
                jobs.push(JobSpec::new("", SourceKind::Console, dest, dest_kind));
            }
        }
    }

    if !pending.dest.is_empty() || pending.dest_kind == DestKind::Console {
        warn!("Output option given after the last input is ignored");
    }

    for (index, job) in jobs.iter().enumerate() {
        debug!(index, input = %job, kind = %job.source_kind(), dest = job.dest(), "Job");
    }
    jobs
}

/// Inline and stdin jobs go to standard output unless a file was named.
fn console_unless_redirected((dest, dest_kind): (String, DestKind)) -> (String, DestKind) {
    if dest.is_empty() {
        (dest, DestKind::Console)
    } else {
        (dest, dest_kind)
    }
}

fn tokens(matches: &ArgMatches) -> Vec<Token> {
    let mut indexed: Vec<(usize, Token)> = Vec::new();

    let mut collect = |id: &str, make: fn(String) -> Token| {
        let (Some(indices), Some(values)) =
            (matches.indices_of(id), matches.get_many::<String>(id))
        else {
            return;
        };
        indexed.extend(indices.zip(values.cloned().map(make)));
    };

    collect(ARG_INPUTS, Token::Path);
    collect(ARG_OUTPUT, Token::Output);
    collect(ARG_INPUT, Token::Raw);
    collect(ARG_STDOUT, |_| Token::Stdout);
    collect(ARG_STDIN, |_| Token::Stdin);

    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, token)| token).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    fn jobs(args: &[&str]) -> Vec<JobSpec> {
        let matches = Cli::command()
            .try_get_matches_from(std::iter::once("bltc").chain(args.iter().copied()))
            .unwrap();
        build_jobs(&matches)
    }

    #[test]
    fn plain_inputs_keep_order() {
        assert_eq!(
            jobs(&["b.blt", "a.blt"]),
            vec![JobSpec::path("b.blt"), JobSpec::path("a.blt")]
        );
    }

    #[test]
    fn output_applies_to_next_input_only() {
        assert_eq!(
            jobs(&["-o", "x.lua", "a.blt", "b.blt"]),
            vec![JobSpec::path("a.blt").with_dest("x.lua"), JobSpec::path("b.blt")]
        );
    }

    #[test]
    fn stdout_applies_to_next_input_only() {
        assert_eq!(
            jobs(&["a.blt", "--stdout", "b.blt", "c.blt"]),
            vec![
                JobSpec::path("a.blt"),
                JobSpec::path("b.blt").to_console(),
                JobSpec::path("c.blt"),
            ]
        );
    }

    #[test]
    fn later_option_overrides_earlier_one() {
        assert_eq!(
            jobs(&["--stdout", "-o", "x.lua", "a.blt"]),
            vec![JobSpec::path("a.blt").with_dest("x.lua")]
        );
        assert_eq!(
            jobs(&["-o", "x.lua", "--stdout", "a.blt"]),
            vec![JobSpec::path("a.blt").to_console()]
        );
    }

    #[test]
    fn inline_and_stdin_default_to_console() {
        assert_eq!(
            jobs(&["-I", "`x`", "--stdin"]),
            vec![
                JobSpec::raw("`x`").to_console(),
                JobSpec::console().to_console(),
            ]
        );
    }

    #[test]
    fn inline_with_output_writes_file() {
        assert_eq!(
            jobs(&["-o", "asdf", "--stdin", "-I", "`y`"]),
            vec![
                JobSpec::console().with_dest("asdf"),
                JobSpec::raw("`y`").to_console(),
            ]
        );
    }

    #[test]
    fn interleaved_kinds_keep_command_line_order() {
        let built = jobs(&["a.blt", "--stdin", "-I", "`z`", "b.blt"]);
        let kinds: Vec<_> = built.iter().map(JobSpec::source_kind).collect();
        assert_eq!(
            kinds,
            [
                SourceKind::Path,
                SourceKind::Console,
                SourceKind::Raw,
                SourceKind::Path
            ]
        );
    }

    #[test]
    fn trailing_output_creates_no_job() {
        assert_eq!(jobs(&["a.blt", "-o", "x.lua"]), vec![JobSpec::path("a.blt")]);
    }

    #[test]
    fn no_job_options_means_no_jobs() {
        assert!(jobs(&["-D", "views"]).is_empty());
    }
}
