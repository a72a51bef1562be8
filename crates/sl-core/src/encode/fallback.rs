//! Last-resort encoding after the retry buffer also overflowed.
//!
//! JSON records are collected into a `serde_json` map and serialized
//! generically; plain records are written into an unbounded buffer. The
//! content matches what the direct writers produce.

use super::number::float_value;
use super::{plain, Encoder, Record, TIME_FORMAT};
use crate::field::{Field, FieldValue};
use serde_json::{Map, Value};
use sl_common::{FloatMode, OutputFormat};
use sl_redact::INTERNAL_TARGET;

/// Encode `record` without a size limit.
pub fn encode(encoder: &Encoder<'_>, record: &Record<'_>) -> Vec<u8> {
    match encoder.config().format {
        OutputFormat::Json => encode_json(encoder, record),
        OutputFormat::Plain => encode_plain(encoder, record),
    }
}

fn encode_json(encoder: &Encoder<'_>, record: &Record<'_>) -> Vec<u8> {
    let config = encoder.config();
    let mut obj = Map::new();

    obj.insert("timestamp".to_string(), Value::from(record.timestamp));
    obj.insert("level".to_string(), Value::from(record.level.as_str()));
    obj.insert("msg".to_string(), Value::from(record.message));

    for field in record.fields {
        let value = match encoder.mask_for(field) {
            Some(mask) => Value::from(mask),
            None => field_value(field, config.float_mode),
        };
        obj.insert(field.key().to_string(), value);
    }

    if !config.component.is_empty() {
        obj.insert("component".to_string(), Value::from(config.component.as_str()));
    }
    if !config.version.is_empty() {
        obj.insert("version".to_string(), Value::from(config.version.as_str()));
    }
    if let Some(caller) = record.caller {
        obj.insert("file".to_string(), Value::from(caller.file));
        obj.insert("line".to_string(), Value::from(caller.line));
        if let Some(function) = caller.function {
            obj.insert("function".to_string(), Value::from(function));
        }
    }

    // A string-keyed map of plain values always serializes; the error arm
    // only guards against a future change to that.
    let mut out = match serde_json::to_vec(&Value::Object(obj)) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                target: INTERNAL_TARGET,
                error = %err,
                "fallback serializer failed, record replaced by an empty object"
            );
            b"{}".to_vec()
        }
    };
    out.push(b'\n');
    out
}

fn encode_plain(encoder: &Encoder<'_>, record: &Record<'_>) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(encoder.estimate(record));
    // Only a failing Display impl can stop an unbounded buffer; keep what was
    // written and terminate the line.
    if plain::encode(encoder, &mut out, record).is_err() && out.last() != Some(&b'\n') {
        out.push(b'\n');
    }
    out
}

/// The generic-serializer form of a field value.
pub fn field_value(field: &Field<'_>, float_mode: FloatMode) -> Value {
    match field.value() {
        FieldValue::Str(s) => Value::from(s.as_ref()),
        FieldValue::Int(v) => Value::from(*v as i64),
        FieldValue::Int64(v) => Value::from(*v),
        FieldValue::Float64(v) => float_value(*v, float_mode),
        FieldValue::Bool(v) => Value::from(*v),
        FieldValue::Time(t) => Value::from(t.format(TIME_FORMAT).to_string()),
        FieldValue::Duration(d) => Value::from(format!("{:?}", d)),
        FieldValue::Json(v) => v.clone(),
    }
}
