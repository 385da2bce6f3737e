//! vCard 2.1 / 3.0 record codec.
//!
//! The two versions share the whole state machine and differ only in
//! the version string, the category property name, the default binary
//! encoding label and how qualifier flags are spelled in the attribute
//! list (2.1 writes one bare label per flag, 3.0 a single
//! `TYPE=a,b,c`). Those four hooks hang off [`VCardVersion`].

pub mod tables;

use pimwire_core::fields::{RecordKind, attr, contact};
use pimwire_core::item::{FieldValue, PimRecord};
use pimwire_core::source::LineSource;
use pimwire_core::support::FieldSupport;
use pimwire_core::time;

use crate::encoding::{base64, quoted_printable};
use crate::error::{FormatError, FormatResult};
use crate::line::PropertyLine;
use crate::resolve::{
    self, Encoding, attribute_value, decode_binary, decode_string_array, decode_value,
};

/// Base64 wrap width for binary property payloads.
const BINARY_WRAP: usize = 76;
/// Indent for wrapped binary payload lines.
const BINARY_INDENT: usize = 4;

/// The vCard format variant in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VCardVersion {
    V2_1,
    V3_0,
}

impl VCardVersion {
    #[must_use]
    pub const fn version_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
        }
    }

    /// Property under which the record's categories travel.
    #[must_use]
    pub const fn category_property(self) -> &'static str {
        match self {
            Self::V2_1 => "CATEGORY",
            Self::V3_0 => "CATEGORIES",
        }
    }

    /// Label written after `ENCODING=` for binary payloads.
    #[must_use]
    pub const fn binary_encoding_name(self) -> &'static str {
        match self {
            Self::V2_1 => "BASE64",
            Self::V3_0 => "B",
        }
    }

    /// Collects qualifier flags from an attribute list.
    ///
    /// Unknown labels contribute nothing.
    #[must_use]
    pub fn parse_attributes(self, attributes: &[String]) -> u32 {
        let mut mask = attr::NONE;
        match self {
            Self::V2_1 => {
                for token in attributes {
                    if let Some(flag) = tables::attribute_code(token) {
                        mask |= flag;
                    }
                }
            }
            Self::V3_0 => {
                for token in attributes {
                    if let Some(list) = token.strip_prefix("TYPE=") {
                        for label in list.split(',') {
                            if let Some(flag) = tables::attribute_code(label.trim()) {
                                mask |= flag;
                            }
                        }
                    }
                }
            }
        }
        mask
    }

    /// Appends the attribute-list spelling of a qualifier mask.
    fn write_attributes(self, out: &mut String, mask: u32) {
        if mask == attr::NONE {
            return;
        }
        match self {
            Self::V2_1 => {
                for flag in tables::ATTRIBUTE_FLAGS {
                    if mask & flag != 0
                        && let Some(label) = tables::attribute_label(flag)
                    {
                        out.push(';');
                        out.push_str(label);
                    }
                }
            }
            Self::V3_0 => {
                let labels: Vec<&str> = tables::ATTRIBUTE_FLAGS
                    .iter()
                    .filter(|&&flag| mask & flag != 0)
                    .filter_map(|&flag| tables::attribute_label(flag))
                    .collect();
                if !labels.is_empty() {
                    out.push_str(";TYPE=");
                    out.push_str(&labels.join(","));
                }
            }
        }
    }
}

impl std::fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VCARD/{}", self.version_str())
    }
}

/// Decodes one vCard record from a logical-line source.
///
/// Returns `Ok(None)` when the source is already exhausted.
///
/// ## Errors
/// `FormatError` if the first line is not `BEGIN:VCARD`, a property
/// line is malformed, the VERSION differs from this variant, or the
/// input ends before `END`.
#[tracing::instrument(skip(source, support))]
pub fn decode(
    version: VCardVersion,
    source: &mut dyn LineSource,
    support: &dyn FieldSupport,
) -> FormatResult<Option<PimRecord>> {
    let Some(first) = source.read_logical_line() else {
        return Ok(None);
    };
    if !first.trim().eq_ignore_ascii_case("BEGIN:VCARD") {
        return Err(FormatError::not_a_record("VCARD", &first));
    }

    let mut record = PimRecord::new(RecordKind::Contact);
    let mut pending: Option<PropertyLine> = None;

    loop {
        let mut element = match pending.take() {
            Some(element) => element,
            None => {
                let Some(line) = source.read_logical_line() else {
                    return Err(FormatError::unterminated("VCARD"));
                };
                PropertyLine::parse(&line)?
            }
        };

        // PHOTO/KEY payloads may run on across physical lines; the
        // handler imports them and hands back the line that ended the
        // run, which may itself be another PHOTO or KEY.
        while matches!(element.name.as_str(), "PHOTO" | "KEY")
            && attribute_value(&element.attributes, "ENCODING=").is_some()
        {
            element = import_binary_run(version, element, source, &mut record, support)?;
        }

        match element.name.as_str() {
            "END" => {
                tracing::debug!(fields = record.field_codes().len(), "decoded vCard");
                return Ok(Some(record));
            }
            "VERSION" => {
                if element.value != version.version_str() {
                    return Err(FormatError::unsupported_version(&element.value));
                }
            }
            name if name == version.category_property() => {
                for category in element.value.split(',') {
                    record.add_category(category);
                }
            }
            _ => import_property(version, &mut record, &element, support),
        }
    }
}

/// Reads a PHOTO/KEY payload that continues across lines, imports it,
/// and returns the property line that terminated the run.
///
/// A continuation line is one containing neither `:` nor `;`; the
/// first line that does is the start of the next property. Safe for
/// well-formed Base64 and Quoted-Printable data, where neither
/// character can occur.
fn import_binary_run(
    version: VCardVersion,
    mut element: PropertyLine,
    source: &mut dyn LineSource,
    record: &mut PimRecord,
    support: &dyn FieldSupport,
) -> FormatResult<PropertyLine> {
    let boundary = loop {
        let Some(line) = source.read_logical_line() else {
            return Err(FormatError::unterminated("VCARD"));
        };
        if line.contains(':') || line.contains(';') {
            break line;
        }
        element.value.push_str(line.trim());
    };

    let field = if element.name == "PHOTO" {
        contact::PHOTO
    } else {
        contact::PUBLIC_KEY
    };

    // Payloads under any recognized encoding are normalized to raw
    // bytes; an unrecognized ENCODING= value drops the property.
    let raw = match resolve::resolve_encoding(&element.attributes) {
        Encoding::Base64 => Some(base64::decode(&element.value)),
        Encoding::QuotedPrintable => Some(quoted_printable::decode(&element.value)),
        Encoding::PlainText => {
            if field == contact::PUBLIC_KEY {
                Some(element.value.into_bytes())
            } else {
                tracing::debug!(name = element.name, "unrecognized binary encoding, skipped");
                None
            }
        }
    };

    if let Some(raw) = raw
        && !raw.is_empty()
        && support.is_supported_field(RecordKind::Contact, field)
    {
        let mask = version.parse_attributes(&element.attributes);
        record.add_binary(field, mask, raw);
    }

    PropertyLine::parse(&boundary)
}

/// Imports one generic property into the record.
///
/// Unknown labels and fields the store does not hold fall through
/// silently, so vendor properties never break a record.
fn import_property(
    version: VCardVersion,
    record: &mut PimRecord,
    element: &PropertyLine,
    support: &dyn FieldSupport,
) {
    let mask = version.parse_attributes(&element.attributes);
    let Some(field) = tables::field_code(&element.name) else {
        return;
    };
    if !support.is_supported_field(RecordKind::Contact, field) {
        return;
    }

    match field {
        contact::FORMATTED_NAME
        | contact::FORMATTED_ADDR
        | contact::TEL
        | contact::EMAIL
        | contact::TITLE
        | contact::ORG
        | contact::NICKNAME
        | contact::NOTE
        | contact::UID
        | contact::URL => {
            record.add_text(field, mask, decode_value(&element.attributes, &element.value));
        }
        contact::NAME | contact::ADDR => {
            let mut parts = decode_string_array(&element.attributes, &element.value);
            let expected = support.string_array_size(RecordKind::Contact, field);
            parts.resize(expected, None);
            record.add_text_array(field, mask, parts);
        }
        contact::BIRTHDAY | contact::REVISION => {
            // Either a yyyyMMdd date or a yyyyMMddTHHmmss(Z) date-time.
            let parsed = if element.value.len() < 15 {
                time::parse_date(&element.value)
            } else {
                time::parse_date_time(&element.value)
            };
            match parsed {
                Ok(date) => record.add_date(field, mask, date),
                Err(e) => tracing::warn!(name = element.name, error = %e, "bad date, skipped"),
            }
        }
        contact::PHOTO => match attribute_value(&element.attributes, "VALUE=") {
            None => {
                let data = decode_binary(&element.attributes, &element.value);
                if !data.is_empty() {
                    record.add_binary(contact::PHOTO, mask, data);
                }
            }
            Some("URL") => {
                if support.is_supported_field(RecordKind::Contact, contact::PHOTO_URL) {
                    record.add_text(
                        contact::PHOTO_URL,
                        mask,
                        decode_value(&element.attributes, &element.value),
                    );
                }
            }
            Some(_) => {} // value type not recognized
        },
        contact::PUBLIC_KEY => {
            let data = decode_binary(&element.attributes, &element.value);
            if !data.is_empty() {
                record.add_binary(contact::PUBLIC_KEY, mask, data);
            }
        }
        contact::CLASS => {
            if let Some(code) = tables::class_code(&element.value) {
                record.add_int(contact::CLASS, attr::NONE, i64::from(code));
            }
        }
        _ => {}
    }
}

/// Encodes one contact record as vCard text (CRLF line endings).
#[tracing::instrument(skip(record))]
#[must_use]
pub fn encode(version: VCardVersion, record: &PimRecord) -> String {
    let mut out = String::new();
    out.push_str("BEGIN:VCARD\r\n");
    out.push_str("VERSION:");
    out.push_str(version.version_str());
    out.push_str("\r\n");

    for field in record.field_codes() {
        for entry in record.values(field) {
            write_value(version, &mut out, field, entry.attributes, &entry.value);
        }
    }

    if !record.categories().is_empty() {
        out.push_str(version.category_property());
        out.push(':');
        out.push_str(&record.categories().join(","));
        out.push_str("\r\n");
    }

    out.push_str("END:VCARD\r\n");
    out
}

fn write_value(
    version: VCardVersion,
    out: &mut String,
    field: u32,
    attributes: u32,
    value: &FieldValue,
) {
    let Some(label) = tables::field_label(field) else {
        return; // field cannot be written
    };

    match (field, value) {
        (
            contact::FORMATTED_NAME
            | contact::FORMATTED_ADDR
            | contact::PHOTO_URL
            | contact::TEL
            | contact::EMAIL
            | contact::TITLE
            | contact::ORG
            | contact::NICKNAME
            | contact::NOTE
            | contact::UID
            | contact::URL
            | contact::PUBLIC_KEY_STRING,
            FieldValue::Text(text),
        ) => {
            out.push_str(label);
            version.write_attributes(out, attributes);
            out.push(':');
            out.push_str(text);
            out.push_str("\r\n");
        }
        (contact::NAME | contact::ADDR, FieldValue::TextArray(parts)) => {
            out.push_str(label);
            version.write_attributes(out, attributes);
            out.push(':');
            for (i, part) in parts.iter().enumerate() {
                if let Some(part) = part {
                    out.push_str(part);
                }
                if i != parts.len() - 1 {
                    out.push(';');
                }
            }
            out.push_str("\r\n");
        }
        (contact::PHOTO | contact::PUBLIC_KEY, FieldValue::Binary(raw)) => {
            out.push_str(label);
            out.push_str(";ENCODING=");
            out.push_str(version.binary_encoding_name());
            version.write_attributes(out, attributes);
            if field == contact::PHOTO
                && let Some(image_type) = sniff_image_type(raw)
            {
                out.push_str(";TYPE=");
                out.push_str(image_type);
            }
            // Payload starts on its own line, wrapped and indented.
            out.push_str(":\r\n");
            out.push_str(&base64::encode(raw, BINARY_WRAP, BINARY_INDENT));
            out.push_str("\r\n");
        }
        (contact::BIRTHDAY, FieldValue::Date(date)) => {
            out.push_str(label);
            version.write_attributes(out, attributes);
            out.push(':');
            out.push_str(&time::compose_date(*date));
            out.push_str("\r\n");
        }
        (contact::REVISION, FieldValue::Date(date)) => {
            out.push_str(label);
            version.write_attributes(out, attributes);
            out.push(':');
            out.push_str(&time::compose_date_time(*date));
            out.push_str("\r\n");
        }
        (contact::CLASS, FieldValue::Int(code)) => {
            let Ok(code) = u32::try_from(*code) else {
                return;
            };
            if let Some(class) = tables::class_label(code) {
                out.push_str("CLASS");
                version.write_attributes(out, attributes);
                out.push(':');
                out.push_str(class);
                out.push_str("\r\n");
            }
        }
        _ => {} // value shape does not match the field; ignore
    }
}

/// Best-effort image type from magic bytes.
fn sniff_image_type(raw: &[u8]) -> Option<&'static str> {
    const PNG_SIG: [u8; 16] = [
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52,
    ];
    if raw.starts_with(&[0x42, 0x4d]) {
        return Some("BMP");
    }
    if raw.starts_with(&[0xff, 0xd8, 0xff, 0xe0]) {
        return Some("JPEG");
    }
    if raw.starts_with(&[0x49, 0x49, 0x2a]) {
        return Some("TIFF");
    }
    if raw.starts_with(&[0x47, 0x49, 0x46]) {
        return Some("GIF");
    }
    if raw.starts_with(&PNG_SIG) {
        return Some("PNG");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pimwire_core::source::StrLineSource;
    use pimwire_core::support::AllFields;

    fn decode_str(version: VCardVersion, text: &str) -> FormatResult<Option<PimRecord>> {
        let mut source = StrLineSource::new(text);
        decode(version, &mut source, &AllFields)
    }

    #[test]
    fn decode_minimal_card() {
        let record = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nFN:John Smith\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();

        assert_eq!(record.field_codes(), vec![contact::FORMATTED_NAME]);
        assert_eq!(
            record.first_value(contact::FORMATTED_NAME).unwrap().as_text(),
            Some("John Smith")
        );
        assert!(record.categories().is_empty());
    }

    #[test]
    fn decode_empty_source_is_none() {
        assert!(decode_str(VCardVersion::V2_1, "").unwrap().is_none());
    }

    #[test]
    fn decode_rejects_wrong_begin() {
        let err = decode_str(VCardVersion::V2_1, "BEGIN:VCALENDAR\r\n").unwrap_err();
        assert_eq!(err.kind, crate::error::FormatErrorKind::NotARecord);
    }

    #[test]
    fn decode_rejects_unterminated() {
        let err =
            decode_str(VCardVersion::V2_1, "BEGIN:VCARD\r\nFN:John\r\n").unwrap_err();
        assert_eq!(err.kind, crate::error::FormatErrorKind::UnterminatedRecord);
    }

    #[test]
    fn decode_rejects_foreign_version() {
        let err = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nEND:VCARD\r\n",
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::FormatErrorKind::UnsupportedVersion);
    }

    #[test]
    fn decode_attributes_both_variants() {
        let v21 = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nTEL;HOME;FAX:555-0100\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            v21.values(contact::TEL)[0].attributes,
            attr::HOME | attr::FAX
        );

        let v30 = decode_str(
            VCardVersion::V3_0,
            "BEGIN:VCARD\r\nVERSION:3.0\r\nTEL;TYPE=HOME,FAX:555-0100\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            v30.values(contact::TEL)[0].attributes,
            attr::HOME | attr::FAX
        );
    }

    #[test]
    fn decode_name_padded_to_arity() {
        let record = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nN:Smith;John\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();
        let FieldValue::TextArray(parts) = record.first_value(contact::NAME).unwrap() else {
            panic!("expected text array");
        };
        assert_eq!(parts.len(), contact::NAME_SIZE);
        assert_eq!(parts[0].as_deref(), Some("Smith"));
        assert_eq!(parts[1].as_deref(), Some("John"));
        assert_eq!(parts[2], None);
    }

    #[test]
    fn decode_photo_continuation() {
        let payload = base64::encode(b"not really an image but long enough", 24, 0);
        let mut folded = payload.split("\r\n");
        let first = folded.next().unwrap();
        let rest: Vec<&str> = folded.collect();
        assert!(!rest.is_empty(), "payload must span continuation lines");

        let mut text = format!("BEGIN:VCARD\r\nVERSION:2.1\r\nPHOTO;ENCODING=BASE64:{first}\r\n");
        for line in rest {
            text.push_str(line);
            text.push_str("\r\n");
        }
        text.push_str("FN:John\r\nEND:VCARD\r\n");

        let record = decode_str(VCardVersion::V2_1, &text).unwrap().unwrap();
        assert_eq!(
            record.first_value(contact::PHOTO).unwrap().as_binary(),
            Some(b"not really an image but long enough".as_slice())
        );
        // The boundary line was dispatched as a normal property.
        assert_eq!(
            record.first_value(contact::FORMATTED_NAME).unwrap().as_text(),
            Some("John")
        );
    }

    #[test]
    fn decode_photo_url_form() {
        let record = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nPHOTO;VALUE=URL:http://example.com/me.png\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            record.first_value(contact::PHOTO_URL).unwrap().as_text(),
            Some("http://example.com/me.png")
        );
        assert_eq!(record.count_values(contact::PHOTO), 0);
    }

    #[test]
    fn decode_ignores_unknown_properties() {
        let record = decode_str(
            VCardVersion::V2_1,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nX-VENDOR-THING;FOO=BAR:data\r\nEND:VCARD\r\n",
        )
        .unwrap()
        .unwrap();
        assert!(record.field_codes().is_empty());
    }

    #[test]
    fn encode_sorts_fields_and_writes_categories() {
        let mut record = PimRecord::new(RecordKind::Contact);
        record.add_text(contact::UID, attr::NONE, "u-1");
        record.add_text(contact::FORMATTED_NAME, attr::NONE, "John Smith");
        record.add_category("Friends");
        record.add_category("Work");

        let text = encode(VCardVersion::V2_1, &record);
        let fn_pos = text.find("FN:John Smith").unwrap();
        let uid_pos = text.find("UID:u-1").unwrap();
        assert!(fn_pos < uid_pos);
        assert!(text.contains("CATEGORY:Friends,Work\r\n"));
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:2.1\r\n"));
        assert!(text.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn encode_photo_sniffs_gif() {
        let mut record = PimRecord::new(RecordKind::Contact);
        record.add_binary(contact::PHOTO, attr::NONE, b"GIF89a rest".to_vec());

        let text = encode(VCardVersion::V3_0, &record);
        assert!(text.contains("PHOTO;ENCODING=B;TYPE=GIF:\r\n"));
        assert!(text.contains("    R0lGODlhIHJlc3Q="));
    }

    #[test]
    fn encode_class_line() {
        let mut record = PimRecord::new(RecordKind::Contact);
        record.add_int(
            contact::CLASS,
            attr::NONE,
            i64::from(pimwire_core::fields::class::PRIVATE),
        );
        let text = encode(VCardVersion::V2_1, &record);
        assert!(text.contains("CLASS:PRIVATE\r\n"));
    }

    #[test]
    fn round_trip_structural_equality() {
        let input = "BEGIN:VCARD\r\nVERSION:3.0\r\n\
                     N:Smith;John;;;\r\n\
                     FN:John Smith\r\n\
                     TEL;TYPE=HOME:555-0100\r\n\
                     EMAIL;TYPE=WORK,PREF:js@example.com\r\n\
                     END:VCARD\r\n";
        let first = decode_str(VCardVersion::V3_0, input).unwrap().unwrap();
        let encoded = encode(VCardVersion::V3_0, &first);
        let second = decode_str(VCardVersion::V3_0, &encoded).unwrap().unwrap();
        assert_eq!(first, second);
    }
}
