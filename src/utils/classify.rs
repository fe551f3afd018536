//! Content-type classification from file bytes.
//!
//! Labels are MIME strings derived from the content alone, never from the file
//! extension. Magic-byte signatures come from the `infer` crate; anything it does
//! not recognise is sniffed as text (with a charset parameter) or falls back to
//! `application/octet-stream`.

use encoding_rs::Encoding;

use super::encoding::{
    charset_label, detect_bom, guess_charset, is_binary_content, DEFAULT_SAMPLE_SIZE,
};

/// Label for content that is neither a known format nor text.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Label for empty content.
pub const TEXT_PLAIN: &str = "text/plain";

/// Content-type label plus the charset to decode it with, if it is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub charset: Option<&'static Encoding>,
}

impl Classification {
    fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), charset: None }
    }

    fn text(charset: &'static Encoding) -> Self {
        Self {
            label: format!("{}; charset={}", TEXT_PLAIN, charset_label(charset)),
            charset: Some(charset),
        }
    }
}

/// Maps raw file bytes to a content-type label.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, content: &[u8]) -> Classification;
}

/// Magic-byte sniffer with a text fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct MimeSniffer;

impl ContentClassifier for MimeSniffer {
    fn classify(&self, content: &[u8]) -> Classification {
        if content.is_empty() {
            return Classification::new(TEXT_PLAIN);
        }

        // A BOM is checked first: UTF-16 text is full of NUL bytes.
        if let Some(bom) = detect_bom(content) {
            return Classification::text(bom);
        }

        if let Some(kind) = infer::get(content) {
            return Classification::new(kind.mime_type());
        }

        // Valid UTF-8 is text whatever its script; the printable-ratio check
        // only applies to other encodings.
        if !content.contains(&0) && std::str::from_utf8(content).is_ok() {
            return Classification::text(encoding_rs::UTF_8);
        }

        if is_binary_content(content, DEFAULT_SAMPLE_SIZE) {
            return Classification::new(OCTET_STREAM);
        }

        let sample = &content[..content.len().min(DEFAULT_SAMPLE_SIZE)];
        Classification::text(guess_charset(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(bytes: &[u8]) -> String {
        MimeSniffer.classify(bytes).label
    }

    #[test]
    fn test_utf8_text() {
        assert_eq!(label(b"fn main() {}\n"), "text/plain; charset=utf-8");
        assert_eq!(label("héllo wörld".as_bytes()), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_non_latin_utf8_is_text() {
        for text in ["Привет, мир! Это обычный текст.", "这是一个普通的中文文本文件。", "# 🚀🚀🚀 release notes 🎉🎉"] {
            let class = MimeSniffer.classify(text.as_bytes());
            assert_eq!(class.label, "text/plain; charset=utf-8", "for {:?}", text);
            assert_eq!(class.charset, Some(encoding_rs::UTF_8));
        }
    }

    #[test]
    fn test_utf8_with_nul_is_binary() {
        assert_eq!(label(b"abc\0def ghi"), OCTET_STREAM);
    }

    #[test]
    fn test_empty_is_plain_text() {
        let class = MimeSniffer.classify(b"");
        assert_eq!(class.label, "text/plain");
        assert!(class.charset.is_none());
    }

    #[test]
    fn test_png_by_magic_bytes() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        assert_eq!(label(&png_header), "image/png");
    }

    #[test]
    fn test_pdf_by_magic_bytes() {
        assert_eq!(label(b"%PDF-1.5\n%binary"), "application/pdf");
    }

    #[test]
    fn test_unknown_binary() {
        let bytes = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert_eq!(label(&bytes), OCTET_STREAM);
    }

    #[test]
    fn test_utf16_bom() {
        let bytes = [0xff, 0xfe, b'h', 0, b'i', 0];
        let class = MimeSniffer.classify(&bytes);
        assert_eq!(class.label, "text/plain; charset=utf-16le");
        assert_eq!(class.charset, Some(encoding_rs::UTF_16LE));
    }

    #[test]
    fn test_legacy_charset_is_text() {
        let bytes = b"Le caf\xe9 est tr\xe8s bon, merci beaucoup.\n";
        let class = MimeSniffer.classify(bytes);
        assert!(class.label.starts_with("text/plain; charset="), "got {}", class.label);
        assert_ne!(class.label, "text/plain; charset=utf-8");
        assert!(class.charset.is_some());
    }
}
