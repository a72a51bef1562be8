//! Integer and float writers.

use super::adapter::write_display;
use crate::buffer::{Overflow, RecordBuf};
use sl_common::FloatMode;

/// Write `v` in decimal by direct digit extraction.
#[inline]
pub fn write_i64<B: RecordBuf>(buf: &mut B, v: i64) -> Result<(), Overflow> {
    if (0..10).contains(&v) {
        return buf.push(b'0' + v as u8);
    }
    if (10..100).contains(&v) {
        return buf.extend(&[b'0' + (v / 10) as u8, b'0' + (v % 10) as u8]);
    }

    let mut digits = [0u8; 20];
    let mut pos = digits.len();
    let mut n = v.unsigned_abs();
    while n > 0 {
        pos -= 1;
        digits[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    if v < 0 {
        pos -= 1;
        digits[pos] = b'-';
    }
    buf.extend(&digits[pos..])
}

/// Text for a non-finite float, or `None` for finite values.
pub fn non_finite_text(v: f64) -> Option<&'static str> {
    if v.is_nan() {
        Some("NaN")
    } else if v == f64::INFINITY {
        Some("+Inf")
    } else if v == f64::NEG_INFINITY {
        Some("-Inf")
    } else {
        None
    }
}

/// Write a finite float. `Exact` is the shortest text that round-trips;
/// `OneDecimal` rounds and may lose precision.
pub fn write_finite_f64<B: RecordBuf>(buf: &mut B, v: f64, mode: FloatMode) -> Result<(), Overflow> {
    match mode {
        FloatMode::Exact => write_display(buf, format_args!("{:?}", v)),
        FloatMode::OneDecimal => write_display(buf, format_args!("{:.1}", v)),
    }
}

/// The value a float takes in the generic serializer, matching what the
/// direct writers produce.
pub fn float_value(v: f64, mode: FloatMode) -> serde_json::Value {
    if let Some(text) = non_finite_text(v) {
        return serde_json::Value::String(text.to_string());
    }
    let v = match mode {
        FloatMode::Exact => v,
        FloatMode::OneDecimal => format!("{:.1}", v).parse().unwrap_or(v),
    };
    serde_json::Number::from_f64(v)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
