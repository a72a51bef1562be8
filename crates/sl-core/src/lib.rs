//! scrublog core: structured log records with automatic field redaction.
//!
//! Given a level, a message and typed fields, a [`Logger`] produces one JSON
//! or plain-text line per record and writes it to its sink. Field values are
//! masked when the field's *name* matches a PII or sensitive-data pattern,
//! with no extra work from the caller.
//!
//! # Usage
//!
//! ```
//! use sl_core::{Field, Logger, LoggerConfig, SharedBuffer};
//!
//! let out = SharedBuffer::new();
//! let logger = Logger::new(LoggerConfig::default(), out.clone());
//! logger.info("login", &[Field::str("user_email", "a@b.com"), Field::int64("attempt", 3)]);
//!
//! let line = out.contents();
//! assert!(line.contains(r#""user_email":"***PII***""#));
//! assert!(line.contains(r#""attempt":3"#));
//! ```
//!
//! # Design Notes
//!
//! - The level check is a single atomic load; rejected records do no
//!   classification, timestamp or buffer work.
//! - Short records are assembled in a stack buffer, larger ones in a pooled
//!   heap buffer; an overflow is retried once and then handled by a generic
//!   serializer, so a record is never lost to sizing.
//! - Each record reaches the sink in one write. Sink errors are counted,
//!   never returned.
//! - Configuration is an immutable snapshot; reconfiguring swaps it.

pub mod buffer;
pub mod caller;
pub mod diagnostics;
pub mod encode;
pub mod field;
pub mod layer;
pub mod logger;
pub mod sink;
pub mod timestamp;

pub use caller::Caller;
pub use diagnostics::{init_diagnostics, init_tracing_bridge, DiagnosticsConfig};
pub use encode::{EncodePath, Encoder, Record};
pub use field::{Field, FieldValue};
pub use layer::RedactingLayer;
pub use logger::{default_logger, set_default_logger, Logger};
pub use sink::{SharedBuffer, Sink};
pub use timestamp::TimestampCache;

pub use sl_common::{FloatMode, Level, LoggerConfig, OutputFormat, TimestampResolution};
pub use sl_redact::{Classification, FieldClassifier, PatternSet, RedactionPolicy, INTERNAL_TARGET};
