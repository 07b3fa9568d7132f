//! Pass-through compiler for tests.

use std::io::Write;

use bltc_core::{
    application::ports::Transform,
    error::{BltcError, BltcResult},
};

/// Copies its input to the sink unchanged.
///
/// In debug mode the output is prefixed with `-- debug\n` so tests can see
/// the flag arrived. Input starting with `!error` fails with the rest of its
/// first line as the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransform;

impl IdentityTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for IdentityTransform {
    fn transform(&self, input: &[u8], sink: &mut dyn Write, debug: bool) -> BltcResult<()> {
        if let Some(rest) = input.strip_prefix(b"!error") {
            let line = rest.split(|b| *b == b'\n').next().unwrap_or_default();
            return Err(BltcError::Transform {
                message: String::from_utf8_lossy(line).trim().to_string(),
            });
        }

        if debug {
            write_all(sink, b"-- debug\n")?;
        }
        write_all(sink, input)
    }
}

fn write_all(sink: &mut dyn Write, bytes: &[u8]) -> BltcResult<()> {
    sink.write_all(bytes).map_err(|e| BltcError::Io {
        reason: e.to_string(),
    })
}
