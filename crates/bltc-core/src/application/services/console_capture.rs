//! Read-once capture of standard input.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::{
    application::ports::InputSource,
    error::{BltcError, BltcResult},
};

/// Standard input, read on first use and shared by every console job.
///
/// The first successful read is cached for the rest of the run. A failed
/// read is not cached, so a later job gets another attempt.
pub struct ConsoleCapture {
    state: Mutex<CaptureState>,
}

struct CaptureState {
    source: Box<dyn InputSource>,
    bytes: Option<Arc<[u8]>>,
}

impl ConsoleCapture {
    pub fn new(source: Box<dyn InputSource>) -> Self {
        Self {
            state: Mutex::new(CaptureState {
                source,
                bytes: None,
            }),
        }
    }

    /// Captured bytes, reading the source if this is the first call.
    pub fn bytes(&self) -> BltcResult<Arc<[u8]>> {
        let mut state = self.state.lock().map_err(|_| BltcError::Internal {
            message: "console capture lock poisoned".into(),
        })?;

        if let Some(bytes) = &state.bytes {
            return Ok(Arc::clone(bytes));
        }

        let bytes: Arc<[u8]> = state.source.read_all()?.into();
        debug!(bytes = bytes.len(), "Captured standard input");
        state.bytes = Some(Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Whether standard input has been read yet.
    pub fn is_captured(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.bytes.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockInputSource;
    use mockall::Sequence;

    #[test]
    fn reads_source_once() {
        let mut source = MockInputSource::new();
        source
            .expect_read_all()
            .times(1)
            .returning(|| Ok(b"`= 1 + 1`".to_vec()));

        let capture = ConsoleCapture::new(Box::new(source));
        assert!(!capture.is_captured());

        let first = capture.bytes().unwrap();
        let second = capture.bytes().unwrap();
        assert_eq!(&*first, b"`= 1 + 1`");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(capture.is_captured());
    }

    #[test]
    fn failed_read_is_not_cached() {
        let mut seq = Sequence::new();
        let mut source = MockInputSource::new();
        source
            .expect_read_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Err(BltcError::Io {
                    reason: "broken pipe".into(),
                })
            });
        source
            .expect_read_all()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(b"ok".to_vec()));

        let capture = ConsoleCapture::new(Box::new(source));
        assert!(capture.bytes().is_err());
        assert!(!capture.is_captured());
        assert_eq!(&*capture.bytes().unwrap(), b"ok");
    }
}
