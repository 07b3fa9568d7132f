//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports: resolving inputs,
//! expanding jobs, running work items and aggregating the run status.

pub mod batch_service;
pub mod console_capture;
pub mod job_expander;
pub mod job_runner;
pub mod path_resolver;

pub use batch_service::{BatchOptions, BatchPorts, BatchService, RunSummary};
pub use console_capture::ConsoleCapture;
pub use job_expander::{Expansion, JobExpander};
pub use job_runner::{ConsoleSink, JobRunner};
pub use path_resolver::{PathResolver, Resolution};
