//! Standard input adapters.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bltc_core::{
    application::ports::InputSource,
    error::{BltcError, BltcResult},
};

/// Reads the process's standard input to end of stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for StdinSource {
    fn read_all(&self) -> BltcResult<Vec<u8>> {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .map_err(|e| BltcError::Io {
                reason: format!("Failed to read standard input: {e}"),
            })?;
        Ok(buf)
    }
}

/// Fixed bytes standing in for standard input.
///
/// Clones share a read counter, so tests can check stdin is consumed only
/// once.
#[derive(Debug, Default, Clone)]
pub struct BufferedInput {
    bytes: Vec<u8>,
    reads: Arc<AtomicUsize>,
}

impl BufferedInput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl InputSource for BufferedInput {
    fn read_all(&self) -> BltcResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}
