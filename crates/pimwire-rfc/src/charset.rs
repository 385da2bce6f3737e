//! Character set handling for property values.
//!
//! The target devices only ever shipped UTF-8, US-ASCII and Latin-1
//! data; any other `CHARSET=` name falls back to the default rather
//! than failing the record.

/// Supported character sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    UsAscii,
    Iso8859_1,
}

impl Charset {
    /// Resolves a charset name; `None` for unsupported names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Some(Self::Utf8),
            "US-ASCII" | "ASCII" => Some(Self::UsAscii),
            "ISO-8859-1" | "LATIN1" | "LATIN-1" => Some(Self::Iso8859_1),
            _ => None,
        }
    }

    /// Reinterprets decoded bytes as text under this charset.
    ///
    /// Invalid sequences are substituted, never fatal.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::UsAscii => bytes
                .iter()
                .map(|&b| if b < 0x80 { b as char } else { '\u{FFFD}' })
                .collect(),
            Self::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}
