//! bltc Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the bltc batch template compiler,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             bltc-cli (CLI)              │
//! │   (argument order → ordered JobSpecs)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  (BatchService, JobExpander, JobRunner) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │   (Filesystem, Transform, InputSource)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      bltc-adapters (Infrastructure)     │
//! │ (LocalFilesystem, CommandTransform, ..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (JobSpec, DestinationPlanner, RunStatus)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bltc_core::prelude::*;
//!
//! # fn ports() -> BatchPorts { unimplemented!() }
//! let service = BatchService::new(ports(), BatchOptions::default()).unwrap();
//! let summary = service.run(&[JobSpec::path("*.blt"), JobSpec::raw("`= 1`")]);
//! std::process::exit(i32::from(summary.exit_code));
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BatchOptions, BatchPorts, BatchService, JobError, RunSummary, SetupError,
        ports::{Filesystem, InputSource, MatchKind, Transform},
    };
    pub use crate::domain::{
        DestKind, DestinationPlan, JobSpec, PayloadSource, RunStatus, SourceKind, WorkItem,
    };
    pub use crate::error::{BltcError, BltcResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
