//! Event and to-do field and class label tables.

use pimwire_core::fields::{class, event, todo};

/// Property label for an event field code.
#[must_use]
pub fn event_field_label(field: u32) -> Option<&'static str> {
    match field {
        event::ALARM => Some("DALARM"),
        event::CLASS => Some("CLASS"),
        event::END => Some("DTEND"),
        event::LOCATION => Some("LOCATION"),
        event::NOTE => Some("DESCRIPTION"),
        event::REVISION => Some("LAST-MODIFIED"),
        event::START => Some("DTSTART"),
        event::SUMMARY => Some("SUMMARY"),
        event::UID => Some("UID"),
        _ => None,
    }
}

/// Event field code for a property label.
#[must_use]
pub fn event_field_code(label: &str) -> Option<u32> {
    match label {
        "DALARM" => Some(event::ALARM),
        "CLASS" => Some(event::CLASS),
        "DTEND" => Some(event::END),
        "LOCATION" => Some(event::LOCATION),
        "DESCRIPTION" => Some(event::NOTE),
        "LAST-MODIFIED" => Some(event::REVISION),
        "DTSTART" => Some(event::START),
        "SUMMARY" => Some(event::SUMMARY),
        "UID" => Some(event::UID),
        _ => None,
    }
}

/// Property label for a to-do field code.
///
/// The completed flag has no label of its own; it travels as
/// `STATUS:COMPLETED`.
#[must_use]
pub fn todo_field_label(field: u32) -> Option<&'static str> {
    match field {
        todo::CLASS => Some("CLASS"),
        todo::COMPLETION_DATE => Some("COMPLETED"),
        todo::DUE => Some("DUE"),
        todo::NOTE => Some("DESCRIPTION"),
        todo::PRIORITY => Some("PRIORITY"),
        todo::REVISION => Some("LAST-MODIFIED"),
        todo::SUMMARY => Some("SUMMARY"),
        todo::UID => Some("UID"),
        _ => None,
    }
}

/// To-do field code for a property label.
#[must_use]
pub fn todo_field_code(label: &str) -> Option<u32> {
    match label {
        "CLASS" => Some(todo::CLASS),
        "COMPLETED" => Some(todo::COMPLETION_DATE),
        "DUE" => Some(todo::DUE),
        "DESCRIPTION" => Some(todo::NOTE),
        "PRIORITY" => Some(todo::PRIORITY),
        "LAST-MODIFIED" => Some(todo::REVISION),
        "SUMMARY" => Some(todo::SUMMARY),
        "UID" => Some(todo::UID),
        _ => None,
    }
}

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
