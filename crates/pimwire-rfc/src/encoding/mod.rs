//! Binary sub-encodings used for property values.

pub mod base64;
pub mod quoted_printable;
