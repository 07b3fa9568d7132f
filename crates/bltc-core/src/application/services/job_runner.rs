//! Executes one work item: acquire payload, open sink, transform.

use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::{
    application::{
        JobError,
        ports::{Filesystem, Transform},
        services::console_capture::ConsoleCapture,
    },
    domain::{DestinationPlan, PayloadSource, WorkItem},
    error::BltcError,
};

/// Label used for console output in error reports.
const STDOUT_LABEL: &str = "<stdout>";

/// Shared console sink; stdout in production.
pub type ConsoleSink = Mutex<Box<dyn Write + Send>>;

/// Runs work items against the filesystem and the compiler.
pub struct JobRunner {
    filesystem: Arc<dyn Filesystem>,
    transform: Arc<dyn Transform>,
    console: Arc<ConsoleCapture>,
    stdout: Arc<ConsoleSink>,
    debug: bool,
}

enum Payload<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
    Shared(Arc<[u8]>),
}

impl Deref for Payload<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Borrowed(bytes) => bytes,
            Self::Owned(bytes) => bytes,
            Self::Shared(bytes) => bytes,
        }
    }
}

impl JobRunner {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        transform: Arc<dyn Transform>,
        console: Arc<ConsoleCapture>,
        stdout: Arc<ConsoleSink>,
        debug: bool,
    ) -> Self {
        Self {
            filesystem,
            transform,
            console,
            stdout,
            debug,
        }
    }

    /// Run one item.
    ///
    /// Nothing is written when the payload cannot be read, and the compiler is
    /// never invoked when the destination cannot be opened. Partial output
    /// left by a failed transform is not rolled back.
    #[instrument(skip_all, fields(dest = %item.destination))]
    pub fn run(&self, item: WorkItem) -> Result<(), JobError> {
        let payload = self.acquire(&item.payload)?;
        let label = label_of(&item.payload);

        match &item.destination {
            DestinationPlan::File(path) => {
                let mut sink = self
                    .filesystem
                    .create_file(path)
                    .map_err(|source| JobError::Write {
                        output: path.clone(),
                        source,
                    })?;
                debug!(input = %label, output = %path.display(), "Compiling");
                self.transform
                    .transform(&payload, &mut *sink, self.debug)
                    .map_err(|source| classify(source, &label, path))?;
                sink.flush()
                    .map_err(|err| JobError::Write {
                        output: path.clone(),
                        source: BltcError::filesystem(path, &err),
                    })
            }
            DestinationPlan::Console => {
                let stdout_path = Path::new(STDOUT_LABEL);
                let mut sink = self.stdout.lock().map_err(|_| {
                    JobError::Unexpected(BltcError::Internal {
                        message: "console sink lock poisoned".into(),
                    })
                })?;
                debug!(input = %label, "Compiling to standard output");
                self.transform
                    .transform(&payload, &mut **sink, self.debug)
                    .map_err(|source| classify(source, &label, stdout_path))?;
                sink.flush().map_err(|err| JobError::Write {
                    output: stdout_path.to_path_buf(),
                    source: BltcError::Io {
                        reason: err.to_string(),
                    },
                })
            }
        }
    }

    fn acquire<'a>(&self, source: &'a PayloadSource) -> Result<Payload<'a>, JobError> {
        match source {
            PayloadSource::Literal(text) => Ok(Payload::Borrowed(text.as_bytes())),
            PayloadSource::FileAt(path) => self
                .filesystem
                .read_file(path)
                .map(Payload::Owned)
                .map_err(|source| JobError::Read {
                    input: Some(path.clone()),
                    source,
                }),
            PayloadSource::SharedConsoleCapture => self
                .console
                .bytes()
                .map(Payload::Shared)
                .map_err(|source| JobError::Read {
                    input: None,
                    source,
                }),
        }
    }
}

fn label_of(source: &PayloadSource) -> String {
    match source {
        PayloadSource::FileAt(path) => path.display().to_string(),
        PayloadSource::Literal(_) => "<inline template>".into(),
        PayloadSource::SharedConsoleCapture => "<stdin>".into(),
    }
}

/// Compiler diagnostics are transform errors and stream failures are write
/// errors. A compiler that cannot be started at all is unexpected.
fn classify(source: BltcError, label: &str, output: &Path) -> JobError {
    match source {
        BltcError::Transform { .. } => JobError::Transform {
            input: label.to_string(),
            source,
        },
        BltcError::Io { .. } | BltcError::Filesystem { .. } => JobError::Write {
            output: PathBuf::from(output),
            source,
        },
        other => JobError::Unexpected(other),
    }
}
