//! Human-readable records:
//! `<timestamp> | <LEVEL> | <component> <version>: <message> [k=v ...] (file:line function)`.
//!
//! Values are written as given, except that ASCII control bytes in the
//! message, keys and string values are spelled out (`\n`, `\r`, `\t`,
//! `\xHH`) so every record stays on one line.

use super::adapter::{write_display, write_json_value};
use super::number::{non_finite_text, write_finite_f64, write_i64};
use super::{Encoder, Record, ValueEncoder, TIME_FORMAT};
use crate::buffer::{Overflow, RecordBuf};
use chrono::{DateTime, Utc};
use sl_common::{FloatMode, ANSI_RESET};
use std::time::Duration;

const HEX: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn is_control(b: u8) -> bool {
    b < 0x20 || b == 0x7f
}

/// Write `s`, spelling out control bytes. Quotes and backslashes are kept.
fn write_text<B: RecordBuf>(buf: &mut B, s: &str) -> Result<(), Overflow> {
    let bytes = s.as_bytes();
    if !bytes.iter().copied().any(is_control) {
        return buf.extend(bytes);
    }

    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !is_control(b) {
            continue;
        }
        if start < i {
            buf.extend(&bytes[start..i])?;
        }
        match b {
            b'\n' => buf.extend(b"\\n")?,
            b'\r' => buf.extend(b"\\r")?,
            b'\t' => buf.extend(b"\\t")?,
            _ => buf.extend(&[b'\\', b'x', HEX[(b >> 4) as usize], HEX[(b & 0xf) as usize]])?,
        }
        start = i + 1;
    }
    if start < bytes.len() {
        buf.extend(&bytes[start..])?;
    }
    Ok(())
}

struct PlainValue<'b, B> {
    buf: &'b mut B,
    float_mode: FloatMode,
}

impl<B: RecordBuf> ValueEncoder for PlainValue<'_, B> {
    fn write_str(&mut self, value: &str) -> Result<(), Overflow> {
        write_text(self.buf, value)
    }

    fn write_int(&mut self, value: i64) -> Result<(), Overflow> {
        write_i64(self.buf, value)
    }

    fn write_float(&mut self, value: f64) -> Result<(), Overflow> {
        match non_finite_text(value) {
            Some(text) => self.buf.extend(text.as_bytes()),
            None => write_finite_f64(self.buf, value, self.float_mode),
        }
    }

    fn write_bool(&mut self, value: bool) -> Result<(), Overflow> {
        let text: &[u8] = if value { b"true" } else { b"false" };
        self.buf.extend(text)
    }

    fn write_time(&mut self, value: &DateTime<Utc>) -> Result<(), Overflow> {
        write_display(self.buf, format_args!("{}", value.format(TIME_FORMAT)))
    }

    fn write_duration(&mut self, value: Duration) -> Result<(), Overflow> {
        write_display(self.buf, format_args!("{:?}", value))
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

    buf.extend(record.timestamp.as_bytes())?;
    buf.extend(b" | ")?;
    if config.ansi {
        buf.extend(record.level.ansi_color().as_bytes())?;
        buf.extend(record.level.padded().as_bytes())?;
        buf.extend(ANSI_RESET.as_bytes())?;
    } else {
        buf.extend(record.level.padded().as_bytes())?;
    }
    buf.extend(b" | ")?;

    let has_component = !config.component.is_empty();
    let has_version = !config.version.is_empty();
    if has_component {
        buf.extend(config.component.as_bytes())?;
    }
    if has_version {
        if has_component {
            buf.push(b' ')?;
        }
        buf.extend(config.version.as_bytes())?;
    }
    if has_component || has_version {
        buf.extend(b": ")?;
    }
    write_text(buf, record.message)?;

    if !record.fields.is_empty() {
        buf.extend(b" [")?;
        for (i, field) in record.fields.iter().enumerate() {
            if i > 0 {
                buf.push(b' ')?;
            }
            write_text(buf, field.key())?;
            buf.push(b'=')?;
            match encoder.mask_for(field) {
                Some(mask) => buf.extend(mask.as_bytes())?,
                None => field.write_to(&mut PlainValue {
                    buf: &mut *buf,
                    float_mode: config.float_mode,
                })?,
            }
        }
        buf.push(b']')?;
    }

    if let Some(caller) = record.caller {
        buf.extend(b" (")?;
        buf.extend(caller.file.as_bytes())?;
        buf.push(b':')?;
        write_i64(buf, caller.line.into())?;
        if let Some(function) = caller.function {
            buf.push(b' ')?;
            buf.extend(function.as_bytes())?;
        }
        buf.push(b')')?;
    }

    buf.push(b'\n')
}
