//! Codec error types.

use std::fmt;

use thiserror::Error;

/// Result type for format codec operations.
pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// A fatal error while decoding or encoding one record.
///
/// Every kind aborts the current record; recoverable conditions
/// (unknown charsets, unknown properties, unsupported fields) are
/// handled locally and never surface here.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub message: String,
}

impl FormatError {
    #[must_use]
    pub fn new(kind: FormatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Property line without a top-level colon.
    #[must_use]
    pub fn invalid_line(line: &str) -> Self {
        Self::new(FormatErrorKind::InvalidLine, format!("'{line}'"))
    }

    /// Input did not open with the expected BEGIN line.
    #[must_use]
    pub fn not_a_record(expected: &str, line: &str) -> Self {
        Self::new(
            FormatErrorKind::NotARecord,
            format!("expected BEGIN:{expected}, found '{line}'"),
        )
    }

    /// Input ended before the record's END line.
    #[must_use]
    pub fn unterminated(keyword: &str) -> Self {
        Self::new(FormatErrorKind::UnterminatedRecord, keyword)
    }

    #[must_use]
    pub fn unsupported_version(version: &str) -> Self {
        Self::new(FormatErrorKind::UnsupportedVersion, version)
    }

    /// A property value that must parse did not.
    #[must_use]
    pub fn bad_value(name: &str, value: &str) -> Self {
        Self::new(FormatErrorKind::InvalidLine, format!("{name}:'{value}'"))
    }

    /// BEGIN or END with an argument this codec does not know.
    #[must_use]
    pub fn bad_block(keyword: &str, argument: &str) -> Self {
        Self::new(
            FormatErrorKind::BadBlockArgument,
            format!("{keyword}:{argument}"),
        )
    }

    /// The host store does not hold this record kind.
    #[must_use]
    pub fn unsupported_kind(kind: &str) -> Self {
        Self::new(FormatErrorKind::UnsupportedRecordKind, kind)
    }

    /// A top-level calendar property this codec does not recognize.
    #[must_use]
    pub fn unrecognized_item(line: &str) -> Self {
        Self::new(FormatErrorKind::UnrecognizedItem, format!("'{line}'"))
    }
}

/// The kind of format error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Malformed property line.
    InvalidLine,
    /// Missing or wrong BEGIN line.
    NotARecord,
    /// Input ended inside a record.
    UnterminatedRecord,
    /// VERSION property names a version this codec does not speak.
    UnsupportedVersion,
    /// BEGIN or END named an unrecognized block.
    BadBlockArgument,
    /// The host store does not hold this record kind.
    UnsupportedRecordKind,
    /// Unrecognized top-level property inside a calendar.
    UnrecognizedItem,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLine => write!(f, "invalid property line"),
            Self::NotARecord => write!(f, "not a recognized record"),
            Self::UnterminatedRecord => write!(f, "unterminated record"),
            Self::UnsupportedVersion => write!(f, "unsupported version"),
            Self::BadBlockArgument => write!(f, "bad BEGIN/END argument"),
            Self::UnsupportedRecordKind => write!(f, "unsupported record kind"),
            Self::UnrecognizedItem => write!(f, "unrecognized item"),
        }
    }
}
