//! Attribute-driven value decoding.
//!
//! Inspects a property's attribute list to pick the character set and
//! binary sub-encoding, then applies them to the raw value text.

use crate::charset::Charset;
use crate::encoding::{base64, quoted_printable};

/// Binary sub-encoding of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    PlainText,
    QuotedPrintable,
    Base64,
}

/// Returns the value of a `KEY=`-style attribute, if present.
#[must_use]
pub fn attribute_value<'a>(attributes: &'a [String], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find_map(|attr| attr.strip_prefix(key))
}

/// Picks the character set named by a `CHARSET=` attribute.
///
/// Unsupported names fall back to the default (UTF-8); that recovery is
/// local and logged, never an error.
#[must_use]
pub fn resolve_charset(attributes: &[String]) -> Charset {
    let Some(name) = attribute_value(attributes, "CHARSET=") else {
        return Charset::default();
    };
    Charset::from_name(name).unwrap_or_else(|| {
        tracing::debug!(charset = name, "unsupported charset, using default");
        Charset::default()
    })
}

/// Picks the binary sub-encoding named by the attribute list.
#[must_use]
pub fn resolve_encoding(attributes: &[String]) -> Encoding {
    for attr in attributes {
        match attr.as_str() {
            "ENCODING=QUOTED-PRINTABLE" | "QUOTED-PRINTABLE" => {
                return Encoding::QuotedPrintable;
            }
            "ENCODING=BASE64" | "BASE64" | "ENCODING=B" => return Encoding::Base64,
            _ => {}
        }
    }
    Encoding::PlainText
}

/// Decodes one value under an explicit encoding and charset.
///
/// Plain text under a non-default charset is reinterpreted through its
/// UTF-8 bytes. That byte round-trip is long-standing device behavior
/// and is preserved exactly.
#[must_use]
pub fn convert_value(value: &str, encoding: Encoding, charset: Charset) -> String {
    match encoding {
        Encoding::QuotedPrintable => charset.decode(&quoted_printable::decode(value)),
        Encoding::Base64 => charset.decode(&base64::decode(value)),
        Encoding::PlainText => {
            if charset == Charset::default() {
                value.to_string()
            } else {
                charset.decode(value.as_bytes())
            }
        }
    }
}

/// Decodes a property value as a single string.
#[must_use]
pub fn decode_value(attributes: &[String], value: &str) -> String {
    convert_value(
        value,
        resolve_encoding(attributes),
        resolve_charset(attributes),
    )
}

/// Decodes a property value as a `;`-separated string array.
///
/// Parts are split on unescaped `;`; parts that decode to the empty
/// string become `None`.
#[must_use]
pub fn decode_string_array(attributes: &[String], value: &str) -> Vec<Option<String>> {
    let encoding = resolve_encoding(attributes);
    let charset = resolve_charset(attributes);

    split_unescaped(value, ';')
        .into_iter()
        .map(|part| {
            let decoded = convert_value(part, encoding, charset);
            if decoded.is_empty() { None } else { Some(decoded) }
        })
        .collect()
}

/// Decodes a property value as raw bytes.
#[must_use]
pub fn decode_binary(attributes: &[String], value: &str) -> Vec<u8> {
    match resolve_encoding(attributes) {
        Encoding::QuotedPrintable => quoted_printable::decode(value),
        Encoding::Base64 => base64::decode(value),
        Encoding::PlainText => value.as_bytes().to_vec(),
    }
}

/// Splits on a separator, skipping separators escaped with `\`.
/// The escape byte itself is left in place.
#[must_use]
pub fn split_unescaped(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&value[start..i]);
            start = i + separator.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}
