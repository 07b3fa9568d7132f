//! Infrastructure adapters for bltc.
//!
//! This crate implements the ports defined in `bltc-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod input;
pub mod transform;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use input::{BufferedInput, StdinSource};
pub use transform::{CommandTransform, IdentityTransform};
