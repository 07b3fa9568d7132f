//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `bltc-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: reads, globbing, directory and file creation
//!   - `Transform`: the template compiler
//!   - `InputSource`: standard input
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{Filesystem, InputSource, MatchKind, Transform};

#[cfg(test)]
pub use output::{MockFilesystem, MockInputSource};
