//! Batch Service - main application orchestrator.
//!
//! Runs an ordered list of jobs:
//! 1. Setup once (working dir, search paths, output dir)
//! 2. Expand each job into work items
//! 3. Run each item, reporting failures without stopping
//!
//! The final status is the most severe failure seen.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{
    application::{
        JobError, SetupError,
        ports::{Filesystem, InputSource, MatchKind, Transform},
        services::{
            console_capture::ConsoleCapture,
            job_expander::JobExpander,
            job_runner::JobRunner,
            path_resolver::PathResolver,
        },
    },
    domain::{DEFAULT_OUTPUT_EXTENSION, JobSpec, PlanContext, RunStatus, StatusAggregator},
    error::BltcError,
};

/// Adapters the batch runs against.
pub struct BatchPorts {
    pub filesystem: Arc<dyn Filesystem>,
    pub transform: Arc<dyn Transform>,
    pub input: Box<dyn InputSource>,
    pub stdout: Box<dyn Write + Send>,
}

/// Settings that apply to every job in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Search directories, in precedence order. Relative entries resolve
    /// against the working directory; empty means the working directory.
    pub search_paths: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Defaults to the process working directory.
    pub working_dir: Option<PathBuf>,
    pub extension: String,
    pub debug: bool,
    pub match_kind: MatchKind,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            output_dir: None,
            working_dir: None,
            extension: DEFAULT_OUTPUT_EXTENSION.into(),
            debug: false,
            match_kind: MatchKind::default(),
        }
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub exit_code: u8,
    pub jobs: usize,
    pub items_succeeded: usize,
    pub items_failed: usize,
}

/// Runs batches of jobs.
pub struct BatchService {
    expander: JobExpander,
    runner: JobRunner,
    status: StatusAggregator,
}

impl BatchService {
    /// Perform setup and build the service.
    ///
    /// Fails before any job runs when the working directory is unknown or
    /// the output directory is unusable.
    pub fn new(ports: BatchPorts, options: BatchOptions) -> Result<Self, SetupError> {
        let working_dir = match options.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| SetupError::WorkingDirectory(BltcError::filesystem(".", &e)))?,
        };

        let search_paths: Vec<PathBuf> = if options.search_paths.is_empty() {
            vec![working_dir.clone()]
        } else {
            options
                .search_paths
                .iter()
                .map(|p| working_dir.join(p))
                .collect()
        };
        for path in &search_paths {
            info!(path = %path.display(), "Search path");
        }

        let mut plan = PlanContext::new(working_dir.clone()).with_extension(options.extension);
        if let Some(dir) = options.output_dir {
            let dir = working_dir.join(dir);
            prepare_output_dir(ports.filesystem.as_ref(), &dir)?;
            info!(path = %dir.display(), "Output directory");
            plan = plan.with_output_dir(dir);
        }

        let console = Arc::new(ConsoleCapture::new(ports.input));
        let runner = JobRunner::new(
            Arc::clone(&ports.filesystem),
            ports.transform,
            console,
            Arc::new(Mutex::new(ports.stdout)),
            options.debug,
        );
        let expander = JobExpander::new(
            PathResolver::new(ports.filesystem),
            search_paths,
            plan,
            options.match_kind,
        );

        Ok(Self {
            expander,
            runner,
            status: StatusAggregator::new(),
        })
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        self.expander.search_paths()
    }

    /// Run every job in order. A failing job never stops the ones after it.
    #[instrument(skip_all, fields(jobs = jobs.len()))]
    pub fn run(&self, jobs: &[JobSpec]) -> RunSummary {
        let mut succeeded = 0;
        let mut failed = 0;

        for (index, spec) in jobs.iter().enumerate() {
            let expansion = match self.expander.expand(spec) {
                Ok(expansion) => expansion,
                Err(err) => {
                    self.report(index, spec, &err, Severity::Error);
                    continue;
                }
            };

            for warning in &expansion.warnings {
                self.report(index, spec, warning, Severity::Warning);
            }
            if let Some(err) = &expansion.unmatched {
                self.report(index, spec, err, Severity::Error);
            }

            for item in expansion.items {
                match self.runner.run(item) {
                    Ok(()) => succeeded += 1,
                    Err(err) => {
                        failed += 1;
                        self.report(index, spec, &err, Severity::Error);
                    }
                }
            }
        }

        let status = self.status.current();
        info!(%status, succeeded, failed, "Batch finished");
        RunSummary {
            status,
            exit_code: status.code(),
            jobs: jobs.len(),
            items_succeeded: succeeded,
            items_failed: failed,
        }
    }

    fn report(&self, index: usize, spec: &JobSpec, err: &JobError, severity: Severity) {
        let status = err.status();
        let cause = err.cause().map(ToString::to_string);
        let io_kind = err.cause().and_then(BltcError::io_kind);

        match severity {
            Severity::Warning => warn!(
                job = index,
                input = %spec,
                path = ?err.path(),
                cause = ?cause,
                io_kind = ?io_kind,
                code = status.code(),
                "{err}"
            ),
            Severity::Error => error!(
                job = index,
                input = %spec,
                path = ?err.path(),
                cause = ?cause,
                io_kind = ?io_kind,
                code = status.code(),
                "{err}"
            ),
        }

        for hint in err.suggestions() {
            info!(job = index, "{hint}");
        }

        self.status.raise(status);
    }
}

/// Log level of a report. Both kinds raise the status.
#[derive(Debug, Clone, Copy)]
enum Severity {
    /// The job carried on (an unreadable search directory).
    Warning,
    Error,
}

fn prepare_output_dir(fs: &dyn Filesystem, dir: &Path) -> Result<(), SetupError> {
    if fs.exists(dir) {
        if !fs.is_dir(dir) {
            return Err(SetupError::OutputDirNotDirectory(dir.to_path_buf()));
        }
        return Ok(());
    }
    fs.create_dir_all(dir)
        .map_err(SetupError::OutputDirUnavailable)
}
