//! Core domain layer for bltc.
//!
//! Pure data and computation: job specifications, work items, destination
//! planning and the run status. No I/O happens here; everything that touches
//! the outside world goes through the ports in `crate::application`.

pub mod job;
pub mod planner;
pub mod status;

pub use job::{
    DestKind, DestinationPlan, JobSpec, PayloadSource, ResolvedSource, SourceIdentity, SourceKind,
    WorkItem,
};
pub use planner::{DEFAULT_OUTPUT_EXTENSION, DestinationPlanner, PlanContext};
pub use status::{RunStatus, StatusAggregator};
