//! Record encoder.
//!
//! Writes `prefix (timestamp, level) → message → fields → metadata
//! (component, version, caller) → terminator` straight into a bounds-checked
//! buffer, applying field redaction on the way.
//!
//! [`Encoder::render`] owns the buffer strategy: stack buffer for short
//! records, pooled heap buffer otherwise, one retry at double size on
//! overflow, then the generic-serializer fallback. A record is always
//! produced.

mod adapter;
pub mod escape;
pub mod fallback;
mod json;
pub mod number;
mod plain;

pub use crate::buffer::Overflow;

use crate::buffer::{
    estimate_size, retry_size, BufferPool, HeapBuf, RecordBuf, StackBuf, STACK_CAPACITY,
    STACK_FIELD_LIMIT,
};
use crate::caller::Caller;
use crate::field::Field;
use chrono::{DateTime, Utc};
use sl_common::{Level, LoggerConfig, OutputFormat};
use sl_redact::{FieldClassifier, INTERNAL_TARGET};
use std::time::Duration;

/// chrono format for [`Time`](crate::FieldValue::Time) fields.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Fixed framing bytes (braces, fixed keys, separators) per record.
const FRAME_OVERHEAD: usize = 64;
/// Quotes, colon and separator per field.
const FIELD_OVERHEAD: usize = 6;
/// Fixed keys and punctuation for caller info.
const CALLER_OVERHEAD: usize = 48;

/// Format-specific writer for a single field value.
pub trait ValueEncoder {
    fn write_str(&mut self, value: &str) -> Result<(), Overflow>;
    fn write_int(&mut self, value: i64) -> Result<(), Overflow>;
    fn write_float(&mut self, value: f64) -> Result<(), Overflow>;
    fn write_bool(&mut self, value: bool) -> Result<(), Overflow>;
    fn write_time(&mut self, value: &DateTime<Utc>) -> Result<(), Overflow>;
    fn write_duration(&mut self, value: Duration) -> Result<(), Overflow>;
    fn write_json(&mut self, value: &serde_json::Value) -> Result<(), Overflow>;
}

/// Everything one record is built from.
#[derive(Debug, Clone, Copy)]
pub struct Record<'r> {
    pub level: Level,
    pub timestamp: &'r str,
    pub message: &'r str,
    pub fields: &'r [Field<'r>],
    pub caller: Option<&'r Caller>,
}

impl<'r> Record<'r> {
    pub fn new(level: Level, timestamp: &'r str, message: &'r str, fields: &'r [Field<'r>]) -> Self {
        Record {
            level,
            timestamp,
            message,
            fields,
            caller: None,
        }
    }

    pub fn with_caller(mut self, caller: Option<&'r Caller>) -> Self {
        self.caller = caller;
        self
    }
}

/// Which buffer a record ended up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodePath {
    Stack,
    Pooled,
    Retry,
    Fallback,
}

/// Pure function of `(config, classifier, record)`.
///
/// The classifier is expected to reflect `config.redaction` (toggles and
/// patterns); [`Logger`](crate::Logger) keeps the two in sync.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'c> {
    config: &'c LoggerConfig,
    classifier: &'c FieldClassifier,
}

impl<'c> Encoder<'c> {
    pub fn new(config: &'c LoggerConfig, classifier: &'c FieldClassifier) -> Self {
        Encoder { config, classifier }
    }

    pub fn config(&self) -> &'c LoggerConfig {
        self.config
    }

    /// Replacement text for a field's value, or `None` to write it as-is.
    pub fn mask_for(&self, field: &Field<'_>) -> Option<&'c str> {
        let policy = &self.config.redaction;
        let classification = if policy.redact_all_kinds {
            self.classifier.classify(field.key())
        } else {
            field.classify(self.classifier)
        };
        policy.mask_for(classification)
    }

    /// Encode into `buf`, failing on the first write that does not fit.
    pub fn encode<B: RecordBuf>(&self, buf: &mut B, record: &Record<'_>) -> Result<(), Overflow> {
        match self.config.format {
            OutputFormat::Json => json::encode(self, buf, record),
            OutputFormat::Plain => plain::encode(self, buf, record),
        }
    }

    /// Estimated encoded size of `record`, with margin.
    pub fn estimate(&self, record: &Record<'_>) -> usize {
        let mut content = FRAME_OVERHEAD
            + record.timestamp.len()
            + record.message.len()
            + self.config.component.len()
            + self.config.version.len();
        for field in record.fields {
            content += field.key().len() + field.value().size_hint() + FIELD_OVERHEAD;
        }
        if let Some(caller) = record.caller {
            content += caller.file.len() + caller.function.map_or(0, str::len) + CALLER_OVERHEAD;
        }
        estimate_size(content)
    }

    /// Encode `record` and hand the finished bytes to `out`.
    ///
    /// Never fails: overflow triggers one retry at `max(2 × size, 2 KiB)`,
    /// and a second overflow switches to [`fallback::encode`].
    pub fn render<R>(
        &self,
        record: &Record<'_>,
        pool: &BufferPool,
        out: impl FnOnce(&[u8]) -> R,
    ) -> (R, EncodePath) {
        let estimate = self.estimate(record);

        let overflow = if estimate <= STACK_CAPACITY && record.fields.len() <= STACK_FIELD_LIMIT {
            let mut buf = StackBuf::new();
            match self.encode(&mut buf, record) {
                Ok(()) => return (out(buf.as_bytes()), EncodePath::Stack),
                Err(overflow) => overflow,
            }
        } else {
            let mut buf = pool.acquire(estimate);
            match self.encode(&mut buf, record) {
                Ok(()) => {
                    let result = out(buf.as_bytes());
                    pool.release(buf);
                    return (result, EncodePath::Pooled);
                }
                Err(overflow) => {
                    pool.release(buf);
                    overflow
                }
            }
        };

        let size = retry_size(overflow.capacity);
        let largest_kind = largest_field_kind(record);
        tracing::debug!(
            target: INTERNAL_TARGET,
            estimate,
            capacity = overflow.capacity,
            retry = size,
            largest_kind,
            "record overflowed its buffer, retrying"
        );
        let mut buf = HeapBuf::with_limit(size);
        if self.encode(&mut buf, record).is_ok() {
            return (out(buf.as_bytes()), EncodePath::Retry);
        }

        tracing::debug!(
            target: INTERNAL_TARGET,
            capacity = size,
            fields = record.fields.len(),
            largest_kind,
            "record overflowed retry buffer, using fallback serializer"
        );
        let bytes = fallback::encode(self, record);
        (out(&bytes), EncodePath::Fallback)
    }

    /// Encode to an owned line.
    pub fn render_to_vec(&self, record: &Record<'_>) -> Vec<u8> {
        self.render(record, &BufferPool::new(), <[u8]>::to_vec).0
    }
}

/// Kind of the field with the largest size hint, for overflow diagnostics.
fn largest_field_kind(record: &Record<'_>) -> &'static str {
    record
        .fields
        .iter()
        .max_by_key(|field| field.key().len() + field.value().size_hint())
        .map_or("none", |field| field.value().kind())
}
