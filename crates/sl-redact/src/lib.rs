//! Field-name classification and masking policy for scrublog.
//!
//! Decides, from a field's *key* alone, whether its value must be masked as
//! PII, masked as sensitive data, or emitted as-is.
//!
//! # Key Features
//!
//! - **Two-tier matching**: exact match against a hash set of patterns, then a
//!   substring scan, both on the lowercased key.
//! - **Per-category caches**: answers are cached under the key as given, one
//!   cache for PII and one for sensitive data, behind reader/writer locks.
//! - **Live toggles**: disabling masking for a category short-circuits before
//!   any cache lookup.
//! - **PII first**: a key matching both lists is reported as PII.
//!
//! # Example
//!
//! ```
//! use sl_redact::{Classification, FieldClassifier};
//!
//! let classifier = FieldClassifier::new();
//! assert_eq!(classifier.classify("user_email"), Classification::PII);
//! assert_eq!(classifier.classify("db_password"), Classification::SENSITIVE);
//! assert_eq!(classifier.classify("attempt"), Classification::PUBLIC);
//! ```

pub mod cache;
pub mod classification;
pub mod classifier;
pub mod error;
pub mod pattern;
pub mod policy;

/// `tracing` target of scrublog's own diagnostics.
pub const INTERNAL_TARGET: &str = "scrublog::internal";

pub use cache::ClassificationCache;
pub use classification::Classification;
pub use classifier::FieldClassifier;
pub use error::{RedactionError, Result};
pub use pattern::{PatternSet, DEFAULT_PII_PATTERNS, DEFAULT_SENSITIVE_PATTERNS};
pub use policy::{RedactionPolicy, DEFAULT_PII_MASK, DEFAULT_SENSITIVE_MASK, POLICY_SCHEMA_VERSION};
