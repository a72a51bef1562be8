//! Typed log fields.
//!
//! A [`Field`] borrows from the logging call and is never retained past it.
//! Only the value is ever redacted; the key is written verbatim (escaped for
//! JSON) and is the sole input to classification.

use crate::encode::{Overflow, ValueEncoder};
use chrono::{DateTime, Utc};
use sl_redact::{Classification, FieldClassifier};
use std::borrow::Cow;
use std::time::Duration;

/// A field value. The set of kinds is closed; anything else goes through
/// [`FieldValue::Json`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Str(Cow<'a, str>),
    Int(isize),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Duration(Duration),
    /// Generic value written by `serde_json` (arrays, objects, null, large u64).
    Json(serde_json::Value),
}

impl FieldValue<'_> {
    /// Kind name, reported in encoder diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Int64(_) => "int64",
            FieldValue::Float64(_) => "float64",
            FieldValue::Bool(_) => "bool",
            FieldValue::Time(_) => "time",
            FieldValue::Duration(_) => "duration",
            FieldValue::Json(_) => "json",
        }
    }

    /// Whether values of this kind are subject to key-based masking by default.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldValue::Str(_) | FieldValue::Json(serde_json::Value::String(_))
        )
    }

    /// Rough upper bound of the unescaped encoded width.
    pub(crate) fn size_hint(&self) -> usize {
        match self {
            FieldValue::Str(s) => s.len(),
            FieldValue::Int(_) | FieldValue::Int64(_) => 20,
            FieldValue::Float64(_) => 24,
            FieldValue::Bool(_) => 5,
            FieldValue::Time(_) => 32,
            FieldValue::Duration(_) => 24,
            FieldValue::Json(serde_json::Value::String(s)) => s.len() + 2,
            FieldValue::Json(_) => 64,
        }
    }
}

/// A key and a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    key: Cow<'a, str>,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    /// Build a field from anything convertible to a value. Keys are accepted
    /// verbatim.
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<FieldValue<'a>>) -> Self {
        Field {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn str(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    pub fn int(key: impl Into<Cow<'a, str>>, value: isize) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn int64(key: impl Into<Cow<'a, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn float64(key: impl Into<Cow<'a, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn bool(key: impl Into<Cow<'a, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn time(key: impl Into<Cow<'a, str>>, value: DateTime<Utc>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    pub fn duration(key: impl Into<Cow<'a, str>>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn json(key: impl Into<Cow<'a, str>>, value: serde_json::Value) -> Self {
        Self::new(key, FieldValue::Json(value))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    /// Classification of this field. Non-textual kinds are always public.
    pub fn classify(&self, classifier: &FieldClassifier) -> Classification {
        if self.value.is_textual() {
            classifier.classify(&self.key)
        } else {
            Classification::PUBLIC
        }
    }

    /// Write the value (not the key) with the given format writer.
    pub fn write_to<E: ValueEncoder>(&self, encoder: &mut E) -> Result<(), Overflow> {
        match &self.value {
            FieldValue::Str(s) => encoder.write_str(s),
            FieldValue::Int(v) => encoder.write_int(*v as i64),
            FieldValue::Int64(v) => encoder.write_int(*v),
            FieldValue::Float64(v) => encoder.write_float(*v),
            FieldValue::Bool(v) => encoder.write_bool(*v),
            FieldValue::Time(t) => encoder.write_time(t),
            FieldValue::Duration(d) => encoder.write_duration(*d),
            FieldValue::Json(v) => encoder.write_json(v),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(v: &'a str) -> Self {
        FieldValue::Str(Cow::Borrowed(v))
    }
}

impl From<String> for FieldValue<'_> {
    fn from(v: String) -> Self {
        FieldValue::Str(Cow::Owned(v))
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(v: i32) -> Self {
        FieldValue::Int64(v.into())
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(v: i64) -> Self {
        FieldValue::Int64(v)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(v: u32) -> Self {
        FieldValue::Int64(v.into())
    }
}

impl From<u64> for FieldValue<'_> {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => FieldValue::Int64(v),
            Err(_) => FieldValue::Json(serde_json::Value::from(v)),
        }
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(v: f64) -> Self {
        FieldValue::Float64(v)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Time(v)
    }
}

impl From<Duration> for FieldValue<'_> {
    fn from(v: Duration) -> Self {
        FieldValue::Duration(v)
    }
}

impl From<serde_json::Value> for FieldValue<'_> {
    fn from(v: serde_json::Value) -> Self {
        FieldValue::Json(v)
    }
}

impl<'a> From<&'a serde_json::Value> for FieldValue<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => FieldValue::Str(Cow::Borrowed(s)),
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => FieldValue::Int64(i),
                (None, Some(f)) if !n.is_u64() => FieldValue::Float64(f),
                _ => FieldValue::Json(v.clone()),
            },
            other => FieldValue::Json(other.clone()),
        }
    }
}
