//! One-line JSON records.

use super::adapter::{write_display, write_json_value};
use super::escape::{write_escaped, write_quoted};
use super::number::{non_finite_text, write_finite_f64, write_i64};
use super::{Encoder, Record, ValueEncoder, TIME_FORMAT};
use crate::buffer::{Overflow, RecordBuf};
use chrono::{DateTime, Utc};
use sl_common::FloatMode;
use std::time::Duration;

struct JsonValue<'b, B> {
    buf: &'b mut B,
    float_mode: FloatMode,
}

impl<B: RecordBuf> ValueEncoder for JsonValue<'_, B> {
    fn write_str(&mut self, value: &str) -> Result<(), Overflow> {
        write_quoted(self.buf, value)
    }

    fn write_int(&mut self, value: i64) -> Result<(), Overflow> {
        write_i64(self.buf, value)
    }

    fn write_float(&mut self, value: f64) -> Result<(), Overflow> {
        match non_finite_text(value) {
            // JSON has no NaN/Inf literals.
            Some(text) => write_quoted(self.buf, text),
            None => write_finite_f64(self.buf, value, self.float_mode),
        }
    }

    fn write_bool(&mut self, value: bool) -> Result<(), Overflow> {
        let text: &[u8] = if value { b"true" } else { b"false" };
        self.buf.extend(text)
    }

    fn write_time(&mut self, value: &DateTime<Utc>) -> Result<(), Overflow> {
        self.buf.push(b'"')?;
        write_display(self.buf, format_args!("{}", value.format(TIME_FORMAT)))?;
        self.buf.push(b'"')
    }

    fn write_duration(&mut self, value: Duration) -> Result<(), Overflow> {
        self.buf.push(b'"')?;
        write_display(self.buf, format_args!("{:?}", value))?;
        self.buf.push(b'"')
    }

    fn write_json(&mut self, value: &serde_json::Value) -> Result<(), Overflow> {
        write_json_value(self.buf, value)
    }
}

pub(super) fn encode<B: RecordBuf>(
    encoder: &Encoder<'_>,
    buf: &mut B,
    record: &Record<'_>,
) -> Result<(), Overflow> {
    let config = encoder.config();

    buf.extend(b"{\"timestamp\":\"")?;
    write_escaped(buf, record.timestamp)?;
    buf.extend(b"\",\"level\":\"")?;
    buf.extend(record.level.as_str().as_bytes())?;
    buf.extend(b"\",\"msg\":")?;
    write_quoted(buf, record.message)?;

    for field in record.fields {
        buf.push(b',')?;
        write_quoted(buf, field.key())?;
        buf.push(b':')?;
        match encoder.mask_for(field) {
            Some(mask) => write_quoted(buf, mask)?,
            None => field.write_to(&mut JsonValue {
                buf: &mut *buf,
                float_mode: config.float_mode,
            })?,
        }
    }

    if !config.component.is_empty() {
        buf.extend(b",\"component\":")?;
        write_quoted(buf, &config.component)?;
    }
    if !config.version.is_empty() {
        buf.extend(b",\"version\":")?;
        write_quoted(buf, &config.version)?;
    }
    if let Some(caller) = record.caller {
        buf.extend(b",\"file\":")?;
        write_quoted(buf, caller.file)?;
        buf.extend(b",\"line\":")?;
        write_i64(buf, caller.line.into())?;
        if let Some(function) = caller.function {
            buf.extend(b",\"function\":")?;
            write_quoted(buf, function)?;
        }
    }

    buf.extend(b"}\n")
}
