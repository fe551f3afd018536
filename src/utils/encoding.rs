//! Charset sniffing and decoding for in-memory file content.
//!
//! This module provides the text-side heuristics used by content classification:
//! - BOM detection (UTF-8, UTF-16 LE/BE)
//! - UTF-8 fast-path with strict validation
//! - Fallback charset detection using chardetng
//! - Binary content detection
//! - Decoding with replacement characters

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;

/// Number of leading bytes inspected by the heuristics.
pub const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Detect a byte-order mark at the start of `bytes`.
pub fn detect_bom(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        Some(UTF_8)
    } else if bytes.starts_with(&[0xff, 0xfe]) {
        Some(UTF_16LE)
    } else if bytes.starts_with(&[0xfe, 0xff]) {
        Some(UTF_16BE)
    } else {
        None
    }
}

/// Detect if content is binary (not text).
///
/// Uses two heuristics over the first `sample_size` bytes:
/// 1. Null byte check (strong binary indicator)
/// 2. Ratio of printable ASCII bytes (< 70% = likely binary)
///
/// Bytes >= 0x80 are not counted as printable, so heavily accented legacy text
/// can fall under the threshold.
pub fn is_binary_content(bytes: &[u8], sample_size: usize) -> bool {
    let sample = &bytes[..bytes.len().min(sample_size)];
    if sample.is_empty() {
        return false;
    }

    if sample.contains(&0) {
        return true;
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| {
            (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 // printable + tab, LF, CR
        })
        .count();

    (printable_count as f64 / sample.len() as f64) < 0.70
}

/// Guess the charset of non-UTF-8 text with chardetng.
pub fn guess_charset(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Lowercased charset label as it appears in a MIME parameter.
pub fn charset_label(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}

/// Decode `bytes` to text.
///
/// Valid UTF-8 is borrowed without copying. Otherwise the given charset (or
/// UTF-8) is used and invalid sequences become U+FFFD; a BOM, if present,
/// overrides the given charset.
pub fn decode_text<'a>(bytes: &'a [u8], charset: Option<&'static Encoding>) -> Cow<'a, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }
    let (decoded, _used, _had_errors) = charset.unwrap_or(UTF_8).decode(bytes);
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_bom() {
        let bytes = [0xef, 0xbb, 0xbf, b'H', b'i'];
        assert_eq!(detect_bom(&bytes), Some(UTF_8));
    }

    #[test]
    fn test_detect_utf16_boms() {
        assert_eq!(detect_bom(&[0xff, 0xfe, b'a', 0]), Some(UTF_16LE));
        assert_eq!(detect_bom(&[0xfe, 0xff, 0, b'a']), Some(UTF_16BE));
        assert_eq!(detect_bom(b"plain"), None);
    }

    #[test]
    fn test_is_binary_null_byte() {
        assert!(is_binary_content(&[0x00, 0x01, 0x02], DEFAULT_SAMPLE_SIZE));
    }

    #[test]
    fn test_is_not_binary_text() {
        assert!(!is_binary_content(b"Normal text file", DEFAULT_SAMPLE_SIZE));
        assert!(!is_binary_content(b"", DEFAULT_SAMPLE_SIZE));
    }

    #[test]
    fn test_binary_check_only_samples_prefix() {
        let mut bytes = b"text ".repeat(10);
        bytes.push(0);
        assert!(!is_binary_content(&bytes, 8));
        assert!(is_binary_content(&bytes, DEFAULT_SAMPLE_SIZE));
    }

    #[test]
    fn test_decode_utf8_borrows() {
        let decoded = decode_text("Test content 🚀".as_bytes(), None);
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "Test content 🚀");
    }

    #[test]
    fn test_decode_latin1_with_charset() {
        // "café" in windows-1252
        let bytes = [b'c', b'a', b'f', 0xe9];
        let decoded = decode_text(&bytes, Some(encoding_rs::WINDOWS_1252));
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_decode_invalid_utf8_replaces() {
        let decoded = decode_text(&[b'a', 0xff, b'b'], None);
        assert_eq!(decoded, "a\u{fffd}b");
    }
}
