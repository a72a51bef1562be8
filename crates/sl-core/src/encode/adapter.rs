//! Bridges from `fmt::Write` / `io::Write` producers into a [`RecordBuf`].

use crate::buffer::{Overflow, RecordBuf};
use std::{fmt, io};

struct FmtAdapter<'b, B> {
    buf: &'b mut B,
    overflow: Option<Overflow>,
}

impl<B: RecordBuf> fmt::Write for FmtAdapter<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.extend(s.as_bytes()).map_err(|overflow| {
            self.overflow = Some(overflow);
            fmt::Error
        })
    }
}

/// Format `args` directly into the buffer.
pub fn write_display<B: RecordBuf>(buf: &mut B, args: fmt::Arguments<'_>) -> Result<(), Overflow> {
    let capacity = buf.capacity();
    let mut adapter = FmtAdapter {
        buf,
        overflow: None,
    };
    match fmt::write(&mut adapter, args) {
        Ok(()) => Ok(()),
        // A formatting error not caused by the buffer is treated like an
        // overflow so the record still goes through the fallback path.
        Err(_) => Err(adapter.overflow.unwrap_or(Overflow { capacity })),
    }
}

struct IoAdapter<'b, B> {
    buf: &'b mut B,
}

impl<B: RecordBuf> io::Write for IoAdapter<'_, B> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .extend(data)
            .map_err(|overflow| io::Error::new(io::ErrorKind::WriteZero, overflow))?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serialize a generic value as compact JSON into the buffer.
pub fn write_json_value<B: RecordBuf>(buf: &mut B, value: &serde_json::Value) -> Result<(), Overflow> {
    let capacity = buf.capacity();
    serde_json::to_writer(IoAdapter { buf }, value).map_err(|_| Overflow { capacity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HeapBuf;

    #[test]
    fn test_display_into_buffer() {
        let mut buf = HeapBuf::with_limit(16);
        write_display(&mut buf, format_args!("{}-{}", 1, "a")).unwrap();
        assert_eq!(buf.as_bytes(), b"1-a");
    }

    #[test]
    fn test_display_overflow() {
        let mut buf = HeapBuf::with_limit(4);
        let err = write_display(&mut buf, format_args!("{}", "too long")).unwrap_err();
        assert_eq!(err.capacity, 4);
    }

    #[test]
    fn test_json_value() {
        let mut buf = HeapBuf::with_limit(64);
        write_json_value(&mut buf, &serde_json::json!({"a": [1, null, "x"]})).unwrap();
        assert_eq!(buf.as_bytes(), br#"{"a":[1,null,"x"]}"#);

        let mut small = HeapBuf::with_limit(3);
        assert!(write_json_value(&mut small, &serde_json::json!([1, 2, 3])).is_err());
    }
}
