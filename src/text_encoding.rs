//! Unicode to PDF single-byte font encodings.
//!
//! Text fonts use WinAnsiEncoding. The two line-continuation markers have no
//! glyph there and are drawn from the Symbol font instead.

use crate::wrap::{CARRIED_FORWARD, CONTINUATION};

/// Byte written for characters the text font cannot show
pub const REPLACEMENT: u8 = b'?';

/// Symbol font code of the "carriagereturn" glyph
const SYMBOL_CARRIAGE_RETURN: u8 = 0xBF;
/// Symbol font code of the "arrowright" glyph
const SYMBOL_ARROW_RIGHT: u8 = 0xAE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphSource {
    Text,
    Symbol,
}

/// Consecutive bytes drawn with the same font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRun {
    pub source: GlyphSource,
    pub bytes: Vec<u8>,
}

/// WinAnsiEncoding code for `c`, if it has one
pub fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

fn symbol_byte(c: char) -> Option<u8> {
    match c {
        CARRIED_FORWARD => Some(SYMBOL_CARRIAGE_RETURN),
        CONTINUATION => Some(SYMBOL_ARROW_RIGHT),
        _ => None,
    }
}

/// Split `text` into runs per font. Every char yields exactly one byte.
pub fn encode_runs(text: &str) -> Vec<EncodedRun> {
    let mut runs: Vec<EncodedRun> = Vec::new();
    for c in text.chars() {
        let (source, byte) = match symbol_byte(c) {
            Some(b) => (GlyphSource::Symbol, b),
            None if c == '\t' => (GlyphSource::Text, b' '),
            None => (GlyphSource::Text, win_ansi_byte(c).unwrap_or(REPLACEMENT)),
        };
        match runs.last_mut() {
            Some(run) if run.source == source => run.bytes.push(byte),
            _ => runs.push(EncodedRun {
                source,
                bytes: vec![byte],
            }),
        }
    }
    runs
}

/// Escape bytes for use inside a PDF literal string `( ... )`
pub fn escape_pdf_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out
}

/// Hex-encoded UTF-16BE text string, for the document information dictionary
pub fn pdf_text_string(text: &str) -> String {
    let mut out = String::from("<FEFF");
    for unit in text.encode_utf16() {
        out.push_str(&format!("{:04X}", unit));
    }
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let runs = encode_runs("let x = 1;");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].source, GlyphSource::Text);
        assert_eq!(runs[0].bytes, b"let x = 1;".to_vec());
    }

    #[test]
    fn test_latin1_and_cp1252() {
        assert_eq!(win_ansi_byte('é'), Some(0xE9));
        assert_eq!(win_ansi_byte('€'), Some(0x80));
        assert_eq!(win_ansi_byte('—'), Some(0x97));
        assert_eq!(win_ansi_byte('中'), None);
        assert_eq!(win_ansi_byte('\u{7}'), None);
    }

    #[test]
    fn test_markers_use_symbol_font() {
        let runs = encode_runs("ab\u{21a9}");
        assert_eq!(
            runs,
            vec![
                EncodedRun {
                    source: GlyphSource::Text,
                    bytes: b"ab".to_vec()
                },
                EncodedRun {
                    source: GlyphSource::Symbol,
                    bytes: vec![0xBF]
                },
            ]
        );

        let runs = encode_runs("\u{21aa}cd");
        assert_eq!(runs[0].source, GlyphSource::Symbol);
        assert_eq!(runs[0].bytes, vec![0xAE]);
        assert_eq!(runs[1].bytes, b"cd".to_vec());
    }

    #[test]
    fn test_unmappable_replaced() {
        let runs = encode_runs("a中b\tc");
        assert_eq!(runs[0].bytes, b"a?b c".to_vec());
    }

    #[test]
    fn test_escape_pdf_bytes() {
        assert_eq!(escape_pdf_bytes(b"f(x) \\ y"), b"f\\(x\\) \\\\ y".to_vec());
    }

    #[test]
    fn test_pdf_text_string() {
        assert_eq!(pdf_text_string("A("), "<FEFF00410028>");
        assert_eq!(pdf_text_string("中"), "<FEFF4E2D>");
        assert_eq!(pdf_text_string(""), "<FEFF>");
    }
}
