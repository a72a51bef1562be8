//! Output stream for finished records.
//!
//! Each record is handed to the writer in a single `write_all`. Logging is
//! best-effort: a failed write is neither retried nor reported to the caller.
//! Failures are counted, and the first one is reported through `tracing`.

use sl_redact::INTERNAL_TARGET;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// The configured byte stream.
pub struct Sink {
    writer: Mutex<Box<dyn Write + Send>>,
    errors: AtomicU64,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Sink {
            writer: Mutex::new(Box::new(writer)),
            errors: AtomicU64::new(0),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one finished record.
    pub fn write_record(&self, record: &[u8]) {
        let result = {
            let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            writer.write_all(record)
        };
        if let Err(err) = result {
            let previous = self.errors.fetch_add(1, Ordering::Relaxed);
            if previous == 0 {
                tracing::warn!(
                    target: INTERNAL_TARGET,
                    error = %err,
                    "log sink write failed; further failures are only counted"
                );
            }
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    /// Number of failed writes so far.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("errors", &self.errors())
            .finish_non_exhaustive()
    }
}

/// In-memory writer whose contents stay readable after it was handed to a
/// [`Sink`].
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written records, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
