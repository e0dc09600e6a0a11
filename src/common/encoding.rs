//! Text normalisation for markup output.
//!
//! Every string written into slide markup must be UTF-8. Canvas callers may
//! hand over bytes in a legacy single-byte encoding, so text is routed through
//! [`TextEncoder`] first: ASCII (and, in UTF-8 mode, anything) passes through
//! untouched, the rest is decoded with `encoding_rs`.

use crate::ooxml::error::{ExportError, Result};
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Label of the encoding used when none is configured.
pub const DEFAULT_LEGACY_ENCODING: &str = "iso-8859-1";

/// Resolve an encoding label (`"latin1"`, `"windows-1252"`, `"gbk"`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ExportError::Config(format!("unknown text encoding label: {label}")))
}

/// Converts canvas text bytes into UTF-8.
#[derive(Debug, Clone, Copy)]
pub struct TextEncoder {
    legacy: &'static Encoding,
    utf8_mode: bool,
}

impl TextEncoder {
    pub fn new(legacy: &'static Encoding, utf8_mode: bool) -> Self {
        Self { legacy, utf8_mode }
    }

    pub fn utf8_mode(&self) -> bool {
        self.utf8_mode
    }

    pub fn set_utf8_mode(&mut self, utf8_mode: bool) {
        self.utf8_mode = utf8_mode;
    }

    pub fn legacy_encoding(&self) -> &'static Encoding {
        self.legacy
    }

    /// Normalise `bytes` to UTF-8.
    ///
    /// In UTF-8 mode malformed sequences are replaced with U+FFFD rather than
    /// reinterpreted through the legacy encoding.
    pub fn normalize<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        if self.utf8_mode || bytes.is_ascii() {
            return String::from_utf8_lossy(bytes);
        }
        let (text, _, _) = self.legacy.decode(bytes);
        text
    }
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new(encoding_rs::WINDOWS_1252, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_bypasses_conversion() {
        let enc = TextEncoder::default();
        assert!(matches!(enc.normalize(b"plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_latin1_is_converted() {
        let enc = TextEncoder::new(encoding_for_label("latin1").unwrap(), false);
        assert_eq!(enc.normalize(b"caf\xe9"), "café");
    }

    #[test]
    fn test_utf8_mode_keeps_bytes() {
        let enc = TextEncoder::new(encoding_rs::WINDOWS_1252, true);
        assert_eq!(enc.normalize("café".as_bytes()), "café");
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(ExportError::Config(_))
        ));
        assert_eq!(
            encoding_for_label(DEFAULT_LEGACY_ENCODING).unwrap(),
            encoding_rs::WINDOWS_1252
        );
    }
}
