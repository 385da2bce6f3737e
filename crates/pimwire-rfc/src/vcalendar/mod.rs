//! vCalendar 1.0 record codec.
//!
//! One calendar carries any number of vEvent and vToDo blocks. Decode
//! walks the top-level properties, dispatching into a nested block
//! decoder per BEGIN; encode wraps a single record in its own
//! calendar envelope.

pub mod tables;

use pimwire_core::fields::{RecordKind, attr, event, todo};
use pimwire_core::item::{FieldValue, PimRecord};
use pimwire_core::repeat::RepeatRule;
use pimwire_core::source::LineSource;
use pimwire_core::support::FieldSupport;
use pimwire_core::time;

use crate::error::{FormatError, FormatResult};
use crate::line::PropertyLine;
use crate::resolve::{decode_string_array, decode_value};
use crate::rrule;

const VERSION: &str = "1.0";

/// Decodes every record in one vCalendar stream.
///
/// Returns an empty vector when the source is already exhausted.
///
/// ## Errors
/// `FormatError` on a missing or foreign envelope, an unrecognized
/// top-level property, an unsupported record kind, or a malformed
/// nested block.
#[tracing::instrument(skip(source, support))]
pub fn decode(
    source: &mut dyn LineSource,
    support: &dyn FieldSupport,
) -> FormatResult<Vec<PimRecord>> {
    let Some(first) = source.read_logical_line() else {
        return Ok(Vec::new());
    };
    if !first.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR") {
        return Err(FormatError::not_a_record("VCALENDAR", &first));
    }

    let mut records = Vec::new();
    while let Some(record) = decode_next(source, support)? {
        records.push(record);
    }
    tracing::debug!(records = records.len(), "decoded vCalendar");
    Ok(records)
}

/// Reads top-level properties until the next nested block or the end
/// of the calendar.
fn decode_next(
    source: &mut dyn LineSource,
    support: &dyn FieldSupport,
) -> FormatResult<Option<PimRecord>> {
    loop {
        let Some(line) = source.read_logical_line() else {
            // A calendar without its END line still yields its records.
            return Ok(None);
        };
        let element = PropertyLine::parse(&line)?;

        match element.name.as_str() {
            "BEGIN" => match element.value.to_ascii_uppercase().as_str() {
                "VEVENT" => {
                    if !support.is_kind_supported(RecordKind::Event) {
                        return Err(FormatError::unsupported_kind("VEVENT"));
                    }
                    return decode_event(source, support).map(Some);
                }
                "VTODO" => {
                    if !support.is_kind_supported(RecordKind::Todo) {
                        return Err(FormatError::unsupported_kind("VTODO"));
                    }
                    return decode_todo(source, support).map(Some);
                }
                other => return Err(FormatError::bad_block("BEGIN", other)),
            },
            "END" => {
                if element.value.eq_ignore_ascii_case("VCALENDAR") {
                    return Ok(None);
                }
                return Err(FormatError::bad_block("END", &element.value));
            }
            "PRODID" => {}  // product stamp, nothing to keep
            "CATEGORIES" => {} // categories belong inside a block
            "VERSION" => {
                if element.value != VERSION {
                    return Err(FormatError::unsupported_version(&element.value));
                }
            }
            _ => return Err(FormatError::unrecognized_item(&line)),
        }
    }
}

fn decode_event(
    source: &mut dyn LineSource,
    support: &dyn FieldSupport,
) -> FormatResult<PimRecord> {
    let mut record = PimRecord::new(RecordKind::Event);

    loop {
        let Some(line) = source.read_logical_line() else {
            return Err(FormatError::unterminated("VEVENT"));
        };
        let element = PropertyLine::parse(&line)?;

        match element.name.as_str() {
            "END" => {
                reconcile_alarms(&mut record);
                return Ok(record);
            }
            "VERSION" => {
                if element.value != VERSION {
                    return Err(FormatError::unsupported_version(&element.value));
                }
            }
            "CATEGORIES" => {
                for category in element.value.split(',') {
                    record.add_category(category);
                }
            }
            "RRULE" => {
                let mut rule = RepeatRule::new();
                if !rrule::decode(&mut rule, &element.value, true) {
                    return Err(FormatError::bad_value("RRULE", &element.value));
                }
                record.set_repeat(rule);
            }
            "EXDATE" => {
                // Exception dates only make sense once a rule exists.
                if let Some(rule) = record.repeat_mut() {
                    decode_except_dates(rule, &element.value)?;
                }
            }
            _ => import_event_property(&mut record, &element, support)?,
        }
    }
}

/// Converts absolute DALARM stamps into offsets from the event start.
///
/// At import a DALARM holds seconds since the epoch; once the whole
/// block is read, alarms earlier than the start become `start − alarm`
/// seconds of advance warning and anything else is dropped.
fn reconcile_alarms(record: &mut PimRecord) {
    let Some(start_secs) = record
        .first_value(event::START)
        .and_then(FieldValue::as_date)
        .map(|ms| ms / 1000)
    else {
        return;
    };

    let mut index = 0;
    while index < record.count_values(event::ALARM) {
        let alarm = record.values(event::ALARM)[index].value.as_int();
        match alarm {
            Some(alarm) if alarm < start_secs => {
                record.set_value(
                    event::ALARM,
                    index,
                    attr::NONE,
                    FieldValue::Int(start_secs - alarm),
                );
                index += 1;
            }
            _ => record.remove_value(event::ALARM, index),
        }
    }
}

fn import_event_property(
    record: &mut PimRecord,
    element: &PropertyLine,
    support: &dyn FieldSupport,
) -> FormatResult<()> {
    let Some(field) = tables::event_field_code(&element.name) else {
        return Ok(()); // unknown properties are ignored
    };
    if !support.is_supported_field(RecordKind::Event, field) {
        return Ok(());
    }

    match field {
        event::SUMMARY | event::LOCATION | event::NOTE | event::UID => {
            record.add_text(field, attr::NONE, decode_value(&element.attributes, &element.value));
        }
        event::END | event::REVISION | event::START => {
            let date = time::parse_date_time(&element.value)
                .map_err(|_| FormatError::bad_value(&element.name, &element.value))?;
            record.add_date(field, attr::NONE, date);
        }
        event::CLASS => {
            if !element.attributes.is_empty() {
                return Err(FormatError::bad_value("CLASS", &element.value));
            }
            if let Some(code) = tables::class_code(&element.value) {
                record.add_int(event::CLASS, attr::NONE, i64::from(code));
            }
        }
        event::ALARM => {
            // Only the run time (first array element) is kept.
            let parts = decode_string_array(&element.attributes, &element.value);
            if let Some(Some(run_time)) = parts.first() {
                let stamp = time::parse_date_time(run_time)
                    .map_err(|_| FormatError::bad_value("DALARM", &element.value))?;
                record.add_int(event::ALARM, attr::NONE, stamp / 1000);
            }
        }
        _ => {}
    }
    Ok(())
}

fn decode_todo(
    source: &mut dyn LineSource,
    support: &dyn FieldSupport,
) -> FormatResult<PimRecord> {
    let mut record = PimRecord::new(RecordKind::Todo);

    loop {
        let Some(line) = source.read_logical_line() else {
            return Err(FormatError::unterminated("VTODO"));
        };
        let element = PropertyLine::parse(&line)?;

        match element.name.as_str() {
            "END" => return Ok(record),
            "VERSION" => {
                if element.value != VERSION {
                    return Err(FormatError::unsupported_version(&element.value));
                }
            }
            "CATEGORIES" => {
                for category in element.value.split(',') {
                    record.add_category(category);
                }
            }
            _ => import_todo_property(&mut record, &element, support)?,
        }
    }
}

fn import_todo_property(
    record: &mut PimRecord,
    element: &PropertyLine,
    support: &dyn FieldSupport,
) -> FormatResult<()> {
    if element.name == "STATUS" {
        if element.value.eq_ignore_ascii_case("COMPLETED")
            && record.count_values(todo::COMPLETED) == 0
        {
            record.add_bool(todo::COMPLETED, attr::NONE, true);
        }
        return Ok(());
    }

    let Some(field) = tables::todo_field_code(&element.name) else {
        return Ok(());
    };
    if !support.is_supported_field(RecordKind::Todo, field) {
        return Ok(());
    }

    match field {
        todo::SUMMARY | todo::NOTE | todo::UID => {
            record.add_text(field, attr::NONE, decode_value(&element.attributes, &element.value));
        }
        todo::COMPLETION_DATE | todo::DUE | todo::REVISION => {
            let date = time::parse_date_time(&element.value)
                .map_err(|_| FormatError::bad_value(&element.name, &element.value))?;
            // A completion date implies the completed flag.
            if field == todo::COMPLETION_DATE && record.count_values(todo::COMPLETED) == 0 {
                record.add_bool(todo::COMPLETED, attr::NONE, true);
            }
            record.add_date(field, attr::NONE, date);
        }
        todo::CLASS => {
            if let Some(code) = tables::class_code(&element.value) {
                record.add_int(todo::CLASS, attr::NONE, i64::from(code));
            }
        }
        todo::PRIORITY => {
            // A malformed priority loses the field, not the record.
            if let Ok(priority) = element.value.parse::<i64>() {
                record.add_int(todo::PRIORITY, attr::NONE, priority);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Appends a rule's exception dates, comma separated.
fn decode_except_dates(rule: &mut RepeatRule, data: &str) -> FormatResult<()> {
    let mut cursor = rrule::Cursor::new(data);
    while let Some(date) = cursor.read_date() {
        let stamp = if date.len() < 15 {
            time::parse_date(date)
        } else {
            time::parse_date_time(date)
        }
        .map_err(|_| FormatError::bad_value("EXDATE", data))?;
        rule.add_except_date(stamp);
        if !cursor.has_more() {
            break;
        }
        cursor
            .match_skip(',')
            .ok_or_else(|| FormatError::bad_value("EXDATE", data))?;
    }
    Ok(())
}

/// Encodes one event or to-do record as vCalendar text.
///
/// ## Errors
/// `FormatError::UnsupportedRecordKind` for contact records.
#[tracing::instrument(skip(record))]
pub fn encode(record: &PimRecord) -> FormatResult<String> {
    let mut out = String::new();
    out.push_str("BEGIN:VCALENDAR\r\n");
    out.push_str("VERSION:1.0\r\n");
    match record.kind() {
        RecordKind::Event => encode_event(&mut out, record),
        RecordKind::Todo => encode_todo(&mut out, record),
        RecordKind::Contact => {
            return Err(FormatError::unsupported_kind(record.kind().as_str()));
        }
    }
    out.push_str("END:VCALENDAR\r\n");
    Ok(out)
}

fn encode_event(out: &mut String, record: &PimRecord) {
    out.push_str("BEGIN:VEVENT\r\n");
    for field in record.field_codes() {
        for entry in record.values(field) {
            write_event_value(out, record, field, &entry.value);
        }
    }
    write_categories(out, record);
    if let Some(rule) = record.repeat() {
        if let Some(text) = rrule::encode(rule, None) {
            out.push_str("RRULE:");
            out.push_str(&text);
            out.push_str("\r\n");
        }
        if !rule.except_dates.is_empty() {
            out.push_str("EXDATE;VALUE=DATE:");
            let dates: Vec<String> = rule
                .except_dates
                .iter()
                .map(|&stamp| time::compose_date1(stamp))
                .collect();
            out.push_str(&dates.join(","));
            out.push_str("\r\n");
        }
    }
    out.push_str("END:VEVENT\r\n");
}

fn write_event_value(out: &mut String, record: &PimRecord, field: u32, value: &FieldValue) {
    match (field, value) {
        (event::CLASS, FieldValue::Int(code)) => {
            if let Some(label) = u32::try_from(*code).ok().and_then(tables::class_label) {
                out.push_str("CLASS:");
                out.push_str(label);
                out.push_str("\r\n");
            }
        }
        (event::ALARM, FieldValue::Int(advance)) => {
            // Re-derive the absolute run time; no start, no alarm.
            if let Some(start) = record.first_value(event::START).and_then(FieldValue::as_date) {
                out.push_str("DALARM:");
                out.push_str(&time::compose_date_time(start - advance * 1000));
                out.push_str("\r\n");
            }
        }
        (event::LOCATION | event::NOTE | event::SUMMARY | event::UID, FieldValue::Text(text)) => {
            if let Some(label) = tables::event_field_label(field) {
                out.push_str(label);
                out.push(':');
                out.push_str(text);
                out.push_str("\r\n");
            }
        }
        (event::END | event::REVISION | event::START, FieldValue::Date(date)) => {
            if let Some(label) = tables::event_field_label(field) {
                out.push_str(label);
                out.push(':');
                out.push_str(&time::compose_date_time(*date));
                out.push_str("\r\n");
            }
        }
        _ => {}
    }
}

fn encode_todo(out: &mut String, record: &PimRecord) {
    out.push_str("BEGIN:VTODO\r\n");
    for field in record.field_codes() {
        for entry in record.values(field) {
            write_todo_value(out, field, &entry.value);
        }
    }
    write_categories(out, record);
    out.push_str("END:VTODO\r\n");
}

fn write_todo_value(out: &mut String, field: u32, value: &FieldValue) {
    match (field, value) {
        (todo::CLASS, FieldValue::Int(code)) => {
            if let Some(label) = u32::try_from(*code).ok().and_then(tables::class_label) {
                out.push_str("CLASS:");
                out.push_str(label);
                out.push_str("\r\n");
            }
        }
        (todo::COMPLETED, FieldValue::Bool(true)) => {
            out.push_str("STATUS:COMPLETED\r\n");
        }
        (todo::NOTE | todo::SUMMARY | todo::UID, FieldValue::Text(text)) => {
            if let Some(label) = tables::todo_field_label(field) {
                out.push_str(label);
                out.push(':');
                out.push_str(text);
                out.push_str("\r\n");
            }
        }
        (todo::COMPLETION_DATE | todo::DUE | todo::REVISION, FieldValue::Date(date)) => {
            if let Some(label) = tables::todo_field_label(field) {
                out.push_str(label);
                out.push(':');
                out.push_str(&time::compose_date_time(*date));
                out.push_str("\r\n");
            }
        }
        (todo::PRIORITY, FieldValue::Int(priority)) => {
            out.push_str("PRIORITY:");
            out.push_str(&priority.to_string());
            out.push_str("\r\n");
        }
        _ => {}
    }
}

fn write_categories(out: &mut String, record: &PimRecord) {
    if !record.categories().is_empty() {
        out.push_str("CATEGORIES:");
        out.push_str(&record.categories().join(","));
        out.push_str("\r\n");
    }
}
