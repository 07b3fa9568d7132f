//! Destination planning.
//!
//! Pure path arithmetic: no filesystem access and no failure modes. The
//! output directory is created once during setup, not here.

use std::path::{Path, PathBuf};

use crate::domain::job::{DestKind, DestinationPlan, SourceIdentity};

/// Extension given to compiled outputs unless configured otherwise.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "lua";

/// Global settings the planner applies to every job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
    /// Absolute output directory, if one was configured.
    pub output_dir: Option<PathBuf>,
    /// Directory relative destinations resolve against when there is no
    /// output directory.
    pub working_dir: PathBuf,
    /// Extension substituted into default destinations (no leading dot).
    pub extension: String,
}

impl PlanContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: None,
            working_dir: working_dir.into(),
            extension: DEFAULT_OUTPUT_EXTENSION.into(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }
}

/// Computes final destinations from a source identity and a declared dest.
pub struct DestinationPlanner;

impl DestinationPlanner {
    /// Plan one destination.
    ///
    /// An explicit `dest` is used verbatim for every source, so a glob that
    /// fans out to several files plans all of them onto the same path and
    /// the last one written wins.
    pub fn plan(
        source: SourceIdentity<'_>,
        dest: &str,
        dest_kind: DestKind,
        ctx: &PlanContext,
    ) -> DestinationPlan {
        if dest_kind == DestKind::Console {
            return DestinationPlan::Console;
        }

        if dest.is_empty() {
            return match source {
                SourceIdentity::Path(resolved) => {
                    let base = match &ctx.output_dir {
                        Some(out) => out.join(&resolved.relative),
                        None => resolved.path.clone(),
                    };
                    DestinationPlan::File(base.with_extension(&ctx.extension))
                }
                // No sensible default filename for inline or stdin input.
                SourceIdentity::NonPath => DestinationPlan::Console,
            };
        }

        let dest = Path::new(dest);
        if dest.is_absolute() {
            return DestinationPlan::File(dest.to_path_buf());
        }

        let base = ctx.output_dir.as_deref().unwrap_or(&ctx.working_dir);
        DestinationPlan::File(base.join(dest))
    }
}
