//! Application layer for bltc.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (BatchService and the pieces it drives)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Job and setup error types
//!
//! Path arithmetic and status ordering live in `crate::domain`; this layer
//! wires them to the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BatchOptions, BatchPorts, BatchService, ConsoleCapture, Expansion, JobExpander, JobRunner,
    PathResolver, Resolution, RunSummary,
};

pub use ports::{Filesystem, InputSource, MatchKind, Transform};

pub use error::{JobError, SetupError};
