//! Job expansion: one [`JobSpec`] in, ordered [`WorkItem`]s out.

use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        JobError,
        ports::MatchKind,
        services::path_resolver::PathResolver,
    },
    domain::{
        DestKind, DestinationPlanner, JobSpec, PayloadSource, PlanContext, SourceIdentity,
        SourceKind, WorkItem,
    },
};

/// Work items for one job, plus the failures found while expanding it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Expansion {
    pub items: Vec<WorkItem>,
    /// Search directories that could not be enumerated.
    pub warnings: Vec<JobError>,
    /// Set when a path job matched nothing; `items` is then empty.
    pub unmatched: Option<JobError>,
}

/// Expands job specs using the path resolver and the destination planner.
pub struct JobExpander {
    resolver: PathResolver,
    search_paths: Vec<PathBuf>,
    plan: PlanContext,
    match_kind: MatchKind,
}

impl JobExpander {
    pub fn new(
        resolver: PathResolver,
        search_paths: Vec<PathBuf>,
        plan: PlanContext,
        match_kind: MatchKind,
    ) -> Self {
        Self {
            resolver,
            search_paths,
            plan,
            match_kind,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Expand one job.
    ///
    /// Raw and console jobs always yield exactly one item. A path job yields
    /// one item per match, each planned on its own; zero matches sets
    /// [`Expansion::unmatched`] next to any enumeration warnings. Only an
    /// invalid pattern is an `Err`.
    #[instrument(skip_all, fields(input = %spec, kind = %spec.source_kind()))]
    pub fn expand(&self, spec: &JobSpec) -> Result<Expansion, JobError> {
        match spec.source_kind() {
            SourceKind::Raw => Ok(self.single(spec, PayloadSource::Literal(spec.source().into()))),
            SourceKind::Console => Ok(self.single(spec, PayloadSource::SharedConsoleCapture)),
            SourceKind::Path => self.expand_path(spec),
        }
    }

    fn single(&self, spec: &JobSpec, payload: PayloadSource) -> Expansion {
        let destination = DestinationPlanner::plan(
            SourceIdentity::NonPath,
            spec.dest(),
            spec.dest_kind(),
            &self.plan,
        );
        Expansion {
            items: vec![WorkItem {
                payload,
                destination,
            }],
            warnings: Vec::new(),
            unmatched: None,
        }
    }

    fn expand_path(&self, spec: &JobSpec) -> Result<Expansion, JobError> {
        debug!("Processing input path");

        let resolution = self
            .resolver
            .resolve(spec.source(), &self.search_paths, self.match_kind)
            .map_err(JobError::InvalidPattern)?;

        let warnings: Vec<JobError> = resolution
            .failures
            .into_iter()
            .map(|source| JobError::Read {
                input: None,
                source,
            })
            .collect();

        if resolution.matches.is_empty() {
            return Ok(Expansion {
                items: Vec::new(),
                warnings,
                unmatched: Some(JobError::NoInputMatch {
                    pattern: spec.source().into(),
                    search_paths: self.search_paths.clone(),
                }),
            });
        }

        if resolution.matches.len() > 1 {
            for m in &resolution.matches {
                debug!(path = %m.path.display(), "Expanded input path match");
            }
            if spec.dest_kind() == DestKind::Path && !spec.dest().is_empty() {
                warn!(
                    dest = spec.dest(),
                    matches = resolution.matches.len(),
                    "Several inputs share one explicit output; the last one written wins"
                );
            }
        }

        let items = resolution
            .matches
            .iter()
            .map(|m| WorkItem {
                payload: PayloadSource::FileAt(m.path.clone()),
                destination: DestinationPlanner::plan(
                    SourceIdentity::Path(m),
                    spec.dest(),
                    spec.dest_kind(),
                    &self.plan,
                ),
            })
            .collect();

        Ok(Expansion {
            items,
            warnings,
            unmatched: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::DestinationPlan;
    use crate::error::BltcError;
    use std::io;
    use std::path::Path;
    use std::sync::Arc;

    fn expander(fs: MockFilesystem, plan: PlanContext) -> JobExpander {
        JobExpander::new(
            PathResolver::new(Arc::new(fs)),
            vec![PathBuf::from("/w")],
            plan,
            MatchKind::FilesAndMisc,
        )
    }

    fn globbing(matches: &'static [&'static str]) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob()
            .returning(move |_, _, _| Ok(matches.iter().map(PathBuf::from).collect()));
        fs
    }

    fn file(p: &str) -> DestinationPlan {
        DestinationPlan::File(PathBuf::from(p))
    }

    #[test]
    fn raw_job_yields_one_literal_item_on_console() {
        let mut fs = MockFilesystem::new();
        fs.expect_glob().never();
        let exp = expander(fs, PlanContext::new("/w"));

        let out = exp.expand(&JobSpec::raw("`x`")).unwrap();
        assert_eq!(
            out.items,
            vec![WorkItem {
                payload: PayloadSource::Literal("`x`".into()),
                destination: DestinationPlan::Console,
            }]
        );
    }

    #[test]
    fn console_job_with_dest_writes_file() {
        let exp = expander(MockFilesystem::new(), PlanContext::new("/w"));
        let out = exp.expand(&JobSpec::console().with_dest("asdf")).unwrap();
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].payload, PayloadSource::SharedConsoleCapture);
        assert_eq!(out.items[0].destination, file("/w/asdf"));
    }

    #[test]
    fn zero_matches_is_no_input_match() {
        let exp = expander(globbing(&[]), PlanContext::new("/w"));
        let out = exp.expand(&JobSpec::path("nope.blt")).unwrap();
        assert!(out.items.is_empty());
        assert!(matches!(
            out.unmatched,
            Some(JobError::NoInputMatch { ref pattern, ref search_paths })
                if pattern == "nope.blt" && search_paths == &vec![PathBuf::from("/w")]
        ));
    }

    #[test]
    fn zero_matches_keeps_enumeration_failures() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob().returning(|dir, _, _| {
            Err(BltcError::filesystem(
                dir,
                &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ))
        });
        let exp = expander(fs, PlanContext::new("/w"));

        let out = exp.expand(&JobSpec::path("a.blt")).unwrap();
        assert!(out.items.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].status(), crate::domain::RunStatus::ReadError);
        assert!(out.unmatched.is_some());
    }

    #[test]
    fn fan_out_plans_each_match_independently() {
        let exp = expander(
            globbing(&["/w/a.blt", "/w/b.blt", "/w/c.blt"]),
            PlanContext::new("/w"),
        );
        let out = exp.expand(&JobSpec::path("*.blt")).unwrap();

        let dests: Vec<_> = out.items.iter().map(|i| i.destination.clone()).collect();
        assert_eq!(
            dests,
            vec![file("/w/a.lua"), file("/w/b.lua"), file("/w/c.lua")]
        );
        assert_eq!(
            out.items[1].resolved_source_path(),
            Some(Path::new("/w/b.blt"))
        );
    }

    #[test]
    fn fan_out_with_explicit_dest_shares_destination() {
        let exp = expander(globbing(&["/w/a.blt", "/w/b.blt"]), PlanContext::new("/w"));
        let out = exp.expand(&JobSpec::path("*.blt").with_dest("asdf")).unwrap();
        assert_eq!(out.items.len(), 2);
        assert!(out.items.iter().all(|i| i.destination == file("/w/asdf")));
    }

    #[test]
    fn unreadable_search_path_is_a_warning_when_others_match() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob().returning(|dir, _, _| {
            if dir == Path::new("/locked") {
                Err(BltcError::filesystem(
                    dir,
                    &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                ))
            } else {
                Ok(vec![dir.join("a.blt")])
            }
        });
        let exp = JobExpander::new(
            PathResolver::new(Arc::new(fs)),
            vec![PathBuf::from("/locked"), PathBuf::from("/w")],
            PlanContext::new("/w"),
            MatchKind::FilesAndMisc,
        );

        let out = exp.expand(&JobSpec::path("a.blt")).unwrap();
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].path(), Some(Path::new("/locked")));
        assert_eq!(out.unmatched, None);
    }

    #[test]
    fn invalid_pattern_maps_to_argument_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_glob().returning(|_, p, _| {
            Err(BltcError::InvalidPattern {
                pattern: p.into(),
                reason: "bad".into(),
            })
        });
        let exp = expander(fs, PlanContext::new("/w"));
        let err = exp.expand(&JobSpec::path("[")).unwrap_err();
        assert_eq!(err.status(), crate::domain::RunStatus::ArgumentError);
    }
}
