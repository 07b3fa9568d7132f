//! Template compiler adapters.

mod command;
mod identity;

pub use command::{CommandTransform, DEFAULT_COMPILER, DEFAULT_DEBUG_ARGS};
pub use identity::IdentityTransform;
