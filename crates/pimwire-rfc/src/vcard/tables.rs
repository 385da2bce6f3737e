//! Contact field, attribute and class label tables.
//!
//! Bidirectional, total over nothing: unknown labels and codes return
//! `None`, and the callers decide whether that is ignorable.

use pimwire_core::fields::{attr, class, contact};

/// Property label for a contact field code.
#[must_use]
pub fn field_label(field: u32) -> Option<&'static str> {
    match field {
        contact::FORMATTED_NAME => Some("FN"),
        contact::ADDR => Some("ADR"),
        contact::BIRTHDAY => Some("BDAY"),
        contact::CLASS => Some("CLASS"),
        contact::NAME => Some("N"),
        contact::PHOTO => Some("PHOTO"),
        contact::PHOTO_URL => Some("PHOTO;VALUE=URL"),
        contact::TEL => Some("TEL"),
        contact::TITLE => Some("TITLE"),
        contact::REVISION => Some("REV"),
        contact::URL => Some("URL"),
        contact::UID => Some("UID"),
        contact::PUBLIC_KEY | contact::PUBLIC_KEY_STRING => Some("KEY"),
        contact::FORMATTED_ADDR => Some("LABEL"),
        contact::NICKNAME => Some("NICKNAME"),
        contact::NOTE => Some("NOTE"),
        contact::EMAIL => Some("EMAIL"),
        contact::ORG => Some("ORG"),
        _ => None,
    }
}

/// Contact field code for a property label.
#[must_use]
pub fn field_code(label: &str) -> Option<u32> {
    match label {
        "FN" => Some(contact::FORMATTED_NAME),
        "LABEL" => Some(contact::FORMATTED_ADDR),
        "ADR" => Some(contact::ADDR),
        "BDAY" => Some(contact::BIRTHDAY),
        "CLASS" => Some(contact::CLASS),
        "N" => Some(contact::NAME),
        "PHOTO" => Some(contact::PHOTO),
        "TEL" => Some(contact::TEL),
        "TITLE" => Some(contact::TITLE),
        "REV" => Some(contact::REVISION),
        "URL" => Some(contact::URL),
        "UID" => Some(contact::UID),
        "KEY" => Some(contact::PUBLIC_KEY),
        "NICKNAME" => Some(contact::NICKNAME),
        "NOTE" => Some(contact::NOTE),
        "EMAIL" => Some(contact::EMAIL),
        "ORG" => Some(contact::ORG),
        _ => None,
    }
}

/// Attribute label for a single qualifier flag.
#[must_use]
pub fn attribute_label(flag: u32) -> Option<&'static str> {
    match flag {
        attr::ASST => Some("X-PIMW-ASST"),
        attr::AUTO => Some("CAR"),
        attr::FAX => Some("FAX"),
        attr::HOME => Some("HOME"),
        attr::MOBILE => Some("CELL"),
        attr::OTHER => Some("X-PIMW-OTHER"),
        attr::PAGER => Some("PAGER"),
        attr::PREFERRED => Some("PREF"),
        attr::SMS => Some("MSG"),
        attr::WORK => Some("WORK"),
        _ => None,
    }
}

/// Qualifier flag for an attribute label.
#[must_use]
pub fn attribute_code(label: &str) -> Option<u32> {
    match label {
        "CAR" => Some(attr::AUTO),
        "FAX" => Some(attr::FAX),
        "HOME" => Some(attr::HOME),
        "CELL" => Some(attr::MOBILE),
        "X-PIMW-OTHER" => Some(attr::OTHER),
        "PAGER" => Some(attr::PAGER),
        "PREF" => Some(attr::PREFERRED),
        "MSG" => Some(attr::SMS),
        "WORK" => Some(attr::WORK),
        "X-PIMW-ASST" => Some(attr::ASST),
        _ => None,
    }
}

/// All qualifier flags, for mask iteration on encode.
pub const ATTRIBUTE_FLAGS: [u32; 10] = [
    attr::ASST,
    attr::AUTO,
    attr::FAX,
    attr::HOME,
    attr::MOBILE,
    attr::OTHER,
    attr::PAGER,
    attr::PREFERRED,
    attr::SMS,
    attr::WORK,
];

/// CLASS property label for an access class code.
#[must_use]
pub fn class_label(code: u32) -> Option<&'static str> {
    match code {
        class::CONFIDENTIAL => Some("CONFIDENTIAL"),
        class::PRIVATE => Some("PRIVATE"),
        class::PUBLIC => Some("PUBLIC"),
        _ => None,
    }
}

/// Access class code for a CLASS property value.
#[must_use]
pub fn class_code(label: &str) -> Option<u32> {
    match label {
        "CONFIDENTIAL" => Some(class::CONFIDENTIAL),
        "PRIVATE" => Some(class::PRIVATE),
        "PUBLIC" => Some(class::PUBLIC),
        _ => None,
    }
}
