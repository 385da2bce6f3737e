//! Round-trip decoding and encoding tests across the record codecs.
//!
//! These tests verify that records decoded from interchange text and
//! re-encoded come back structurally identical, for both vCard
//! versions and for vCalendar events and to-dos.

use pimwire_core::fields::{attr, contact, event, todo};
use pimwire_core::item::{FieldValue, PimRecord};
use pimwire_core::source::StrLineSource;
use pimwire_core::support::AllFields;

use crate::encoding::base64;
use crate::vcalendar;
use crate::vcard::{self, VCardVersion};

/// Decode a card, encode it, decode again and compare.
fn card_round_trip(version: VCardVersion, input: &str) -> Result<PimRecord, String> {
    let mut source = StrLineSource::new(input);
    let first = vcard::decode(version, &mut source, &AllFields)
        .map_err(|e| format!("first decode failed: {e}"))?
        .ok_or("no record in input")?;

    let encoded = vcard::encode(version, &first);

    let mut source = StrLineSource::new(&encoded);
    let second = vcard::decode(version, &mut source, &AllFields)
        .map_err(|e| format!("second decode failed: {e}\n{encoded}"))?
        .ok_or("re-encoded card vanished")?;

    if first != second {
        return Err(format!(
            "round trip changed the record:\n{first:#?}\nvs\n{second:#?}\nthrough\n{encoded}"
        ));
    }
    Ok(first)
}

fn calendar_round_trip(input: &str) -> Result<Vec<PimRecord>, String> {
    let mut source = StrLineSource::new(input);
    let first = vcalendar::decode(&mut source, &AllFields)
        .map_err(|e| format!("first decode failed: {e}"))?;

    let mut again = Vec::new();
    for record in &first {
        let encoded = vcalendar::encode(record).map_err(|e| format!("encode failed: {e}"))?;
        let mut source = StrLineSource::new(&encoded);
        let mut records = vcalendar::decode(&mut source, &AllFields)
            .map_err(|e| format!("second decode failed: {e}\n{encoded}"))?;
        if records.len() != 1 {
            return Err(format!("expected one record, got {}", records.len()));
        }
        again.push(records.remove(0));
    }

    if first != again {
        return Err(format!("round trip changed records:\n{first:#?}\nvs\n{again:#?}"));
    }
    Ok(first)
}

#[test_log::test]
fn minimal_card() {
    let record = card_round_trip(
        VCardVersion::V2_1,
        "BEGIN:VCARD\r\nVERSION:2.1\r\nFN:John Smith\r\nEND:VCARD\r\n",
    )
    .unwrap();
    assert_eq!(record.field_codes(), vec![contact::FORMATTED_NAME]);
    assert_eq!(
        record.first_value(contact::FORMATTED_NAME).unwrap().as_text(),
        Some("John Smith")
    );
}

#[test_log::test]
fn rich_card_both_versions() {
    let v21 = "BEGIN:VCARD\r\nVERSION:2.1\r\n\
               N:Smith;John;Q;Dr;\r\n\
               FN:Dr John Q Smith\r\n\
               TEL;HOME;PREF:555-0100\r\n\
               TEL;WORK;FAX:555-0199\r\n\
               ADR;HOME:;;123 Main St;Springfield;;12345;USA\r\n\
               EMAIL:js@example.com\r\n\
               BDAY:19700415\r\n\
               REV:20260823T120000Z\r\n\
               TITLE:Engineer\r\n\
               ORG:Example Corp\r\n\
               NOTE:likes trains\r\n\
               CLASS:PRIVATE\r\n\
               CATEGORY:Friends,Work\r\n\
               END:VCARD\r\n";
    let record = card_round_trip(VCardVersion::V2_1, v21).unwrap();
    assert_eq!(record.count_values(contact::TEL), 2);
    assert_eq!(
        record.values(contact::TEL)[0].attributes,
        attr::HOME | attr::PREFERRED
    );
    assert_eq!(record.categories(), ["Friends", "Work"]);

    let v30 = "BEGIN:VCARD\r\nVERSION:3.0\r\n\
               N:Smith;John;;;\r\n\
               FN:John Smith\r\n\
               TEL;TYPE=CELL,PREF:555-0100\r\n\
               CATEGORIES:Work\r\n\
               END:VCARD\r\n";
    let record = card_round_trip(VCardVersion::V3_0, v30).unwrap();
    assert_eq!(
        record.values(contact::TEL)[0].attributes,
        attr::MOBILE | attr::PREFERRED
    );
}

#[test_log::test]
fn photo_payload_across_continuation_lines() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let folded = base64::encode(&payload, 40, 0);
    let mut lines = folded.split("\r\n");
    let first = lines.next().unwrap();

    let mut input = format!("BEGIN:VCARD\r\nVERSION:2.1\r\nPHOTO;ENCODING=BASE64:{first}\r\n");
    for line in lines {
        input.push_str(line);
        input.push_str("\r\n");
    }
    input.push_str("END:VCARD\r\n");

    let record = card_round_trip(VCardVersion::V2_1, &input).unwrap();
    assert_eq!(
        record.first_value(contact::PHOTO).unwrap().as_binary(),
        Some(payload.as_slice())
    );
}

#[test_log::test]
fn quoted_printable_text_value() {
    let input = "BEGIN:VCARD\r\nVERSION:2.1\r\n\
                 NOTE;ENCODING=QUOTED-PRINTABLE;CHARSET=UTF-8:caf=C3=A9 au lait\r\n\
                 END:VCARD\r\n";
    let mut source = StrLineSource::new(input);
    let record = vcard::decode(VCardVersion::V2_1, &mut source, &AllFields)
        .unwrap()
        .unwrap();
    assert_eq!(
        record.first_value(contact::NOTE).unwrap().as_text(),
        Some("café au lait")
    );
}

#[test_log::test]
fn full_event_calendar() {
    let input = "BEGIN:VCALENDAR\r\nVERSION:1.0\r\n\
                 BEGIN:VEVENT\r\n\
                 SUMMARY:Team lunch\r\n\
                 LOCATION:Cafeteria\r\n\
                 DESCRIPTION:Bring the roadmap\r\n\
                 DTSTART:20260823T120000Z\r\n\
                 DTEND:20260823T130000Z\r\n\
                 DALARM:20260823T114500Z\r\n\
                 CLASS:PUBLIC\r\n\
                 CATEGORIES:Work\r\n\
                 RRULE:W1 MO #10\r\n\
                 EXDATE;VALUE=DATE:20260907\r\n\
                 END:VEVENT\r\n\
                 END:VCALENDAR\r\n";
    let records = calendar_round_trip(input).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(
        record.first_value(event::ALARM).unwrap().as_int(),
        Some(900)
    );
    let rule = record.repeat().expect("rule");
    assert_eq!(rule.count, Some(10));
    assert_eq!(rule.except_dates.len(), 1);
}

#[test_log::test]
fn event_and_todo_in_one_calendar() {
    let input = "BEGIN:VCALENDAR\r\nVERSION:1.0\r\n\
                 BEGIN:VEVENT\r\nSUMMARY:A\r\nEND:VEVENT\r\n\
                 BEGIN:VTODO\r\n\
                 SUMMARY:Pack bags\r\n\
                 DUE:20260901T000000Z\r\n\
                 PRIORITY:2\r\n\
                 COMPLETED:20260820T120000Z\r\n\
                 CLASS:CONFIDENTIAL\r\n\
                 END:VTODO\r\n\
                 END:VCALENDAR\r\n";
    let records = calendar_round_trip(input).unwrap();
    assert_eq!(records.len(), 2);
    let task = &records[1];
    assert_eq!(
        task.first_value(todo::COMPLETED),
        Some(&FieldValue::Bool(true))
    );
    assert!(task.first_value(todo::COMPLETION_DATE).is_some());
    assert_eq!(task.first_value(todo::PRIORITY).unwrap().as_int(), Some(2));
}

#[test_log::test]
fn binary_key_survives_re_encoding() {
    let key = b"-----BEGIN KEY----- fake -----END KEY-----";
    let encoded = base64::encode(key, 76, 0);

    let input = format!(
        "BEGIN:VCARD\r\nVERSION:3.0\r\nKEY;ENCODING=B:{encoded}\r\nFN:X\r\nEND:VCARD\r\n"
    );
    let record = card_round_trip(VCardVersion::V3_0, &input).unwrap();
    assert_eq!(
        record.first_value(contact::PUBLIC_KEY).unwrap().as_binary(),
        Some(key.as_slice())
    );
}
