//! JSON string escaping.

use crate::buffer::{Overflow, RecordBuf};

const HEX: &[u8; 16] = b"0123456789abcdef";

#[inline]
fn needs_escape(b: u8) -> bool {
    b < 0x20 || b == b'"' || b == b'\\' || b == 0x7f
}

/// Write `s` with JSON escaping (no surrounding quotes).
///
/// Scans for any byte that needs escaping first; clean strings are copied in
/// one write.
pub fn write_escaped<B: RecordBuf>(buf: &mut B, s: &str) -> Result<(), Overflow> {
    let bytes = s.as_bytes();
    if !bytes.iter().copied().any(needs_escape) {
        return buf.extend(bytes);
    }

    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !needs_escape(b) {
            continue;
        }
        if start < i {
            buf.extend(&bytes[start..i])?;
        }
        match b {
            b'"' => buf.extend(b"\\\"")?,
            b'\\' => buf.extend(b"\\\\")?,
            b'\n' => buf.extend(b"\\n")?,
            b'\r' => buf.extend(b"\\r")?,
            b'\t' => buf.extend(b"\\t")?,
            0x08 => buf.extend(b"\\b")?,
            0x0c => buf.extend(b"\\f")?,
            _ => buf.extend(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[(b >> 4) as usize],
                HEX[(b & 0xf) as usize],
            ])?,
        }
        start = i + 1;
    }
    if start < bytes.len() {
        buf.extend(&bytes[start..])?;
    }
    Ok(())
}

/// Write `s` as a quoted JSON string.
pub fn write_quoted<B: RecordBuf>(buf: &mut B, s: &str) -> Result<(), Overflow> {
    buf.push(b'"')?;
    write_escaped(buf, s)?;
    buf.push(b'"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> String {
        let mut out: Vec<u8> = Vec::new();
        write_escaped(&mut out, s).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_clean_string_unchanged() {
        assert_eq!(escaped("hello world"), "hello world");
        assert_eq!(escaped("héllo ✓"), "héllo ✓");
        assert_eq!(escaped(""), "");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(escaped(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escaped(r"C:\tmp"), r"C:\\tmp");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escaped("a\nb\rc\td"), "a\\nb\\rc\\td");
        assert_eq!(escaped("\u{8}\u{c}"), "\\b\\f");
        assert_eq!(escaped("\u{0}\u{1f}\u{7f}"), "\\u0000\\u001f\\u007f");
    }

    #[test]
    fn test_escaped_output_parses_back() {
        let original = "line1\nline2\t\"quoted\" \\ \u{1}\u{7f} é";
        let mut out: Vec<u8> = Vec::new();
        write_quoted(&mut out, original).unwrap();
        let parsed: String = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_overflow_propagates() {
        let mut buf = crate::buffer::HeapBuf::with_limit(3);
        assert!(write_escaped(&mut buf, "\"\"").is_err());
    }
}
