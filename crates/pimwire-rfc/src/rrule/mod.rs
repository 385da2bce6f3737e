//! vCalendar 1.0 basic recurrence grammar.
//!
//! Rules follow the Electronic Calendaring and Scheduling Exchange
//! Format 1.0: a frequency prefix (`D`, `W`, `MD`, `MP`, `YD`, `YM`),
//! an interval, frequency-specific qualifiers, an optional `#count`
//! and an optional end date. A monthly-by-position rule may carry a
//! trailing weekday qualifier, and a yearly-by-month rule a trailing
//! monthly rule; those tails are parsed with `is_top = false`, where
//! they only contribute qualifier masks.

mod cursor;

pub use cursor::Cursor;

use pimwire_core::repeat::{Frequency, RepeatRule, month, week, weekday};
use pimwire_core::time;

const WEEKDAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];
const WEEKDAY_FLAGS: [u32; 7] = [
    weekday::SUNDAY,
    weekday::MONDAY,
    weekday::TUESDAY,
    weekday::WEDNESDAY,
    weekday::THURSDAY,
    weekday::FRIDAY,
    weekday::SATURDAY,
];

const WEEK_CODES: [&str; 10] = ["1+", "2+", "3+", "4+", "5+", "1-", "2-", "3-", "4-", "5-"];
const WEEK_FLAGS: [u32; 10] = [
    week::FIRST,
    week::SECOND,
    week::THIRD,
    week::FOURTH,
    week::FIFTH,
    week::LAST,
    week::SECOND_LAST,
    week::THIRD_LAST,
    week::FOURTH_LAST,
    week::FIFTH_LAST,
];

const MONTH_FLAGS: [u32; 12] = [
    month::JANUARY,
    month::FEBRUARY,
    month::MARCH,
    month::APRIL,
    month::MAY,
    month::JUNE,
    month::JULY,
    month::AUGUST,
    month::SEPTEMBER,
    month::OCTOBER,
    month::NOVEMBER,
    month::DECEMBER,
];

/// Decodes one rule string into `rule`.
///
/// Returns `false` on any malformed input; the caller must discard the
/// partially filled rule. Qualifier masks (weekdays, ordinal weeks,
/// months) are taken at every level, while FREQUENCY, INTERVAL, COUNT
/// and the end date are taken only at the top level.
#[must_use]
pub fn decode(rule: &mut RepeatRule, text: &str, is_top: bool) -> bool {
    decode_inner(rule, text, is_top).is_some()
}

fn decode_inner(rule: &mut RepeatRule, text: &str, is_top: bool) -> Option<()> {
    let mut cursor = Cursor::new(text);
    cursor.skip_blank();

    match cursor.read_char()? {
        'D' => {
            let interval = cursor.read_int()?;
            if is_top {
                rule.frequency = Some(Frequency::Daily);
                rule.interval = Some(interval);
            }
            read_count_and_end(&mut cursor, rule, is_top)?;
        }
        'W' => {
            let interval = cursor.read_int()?;
            if is_top {
                rule.frequency = Some(Frequency::Weekly);
                rule.interval = Some(interval);
            }
            rule.day_in_week = Some(decode_weekdays(&mut cursor)?);
            read_count_and_end(&mut cursor, rule, is_top)?;
        }
        'M' => {
            if is_top {
                rule.frequency = Some(Frequency::Monthly);
            }
            match cursor.read_char()? {
                'D' => {
                    let interval = cursor.read_int()?;
                    if is_top {
                        rule.interval = Some(interval);
                    }
                    cursor.skip_blank();
                    rule.day_in_month = Some(cursor.read_int()?);
                    read_count_and_end(&mut cursor, rule, is_top)?;
                }
                'P' => {
                    let interval = cursor.read_int()?;
                    if is_top {
                        rule.interval = Some(interval);
                    }
                    cursor.skip_blank();
                    rule.week_in_month = Some(decode_weeks(&mut cursor)?);
                    read_count_and_end(&mut cursor, rule, is_top)?;
                    cursor.skip_blank();
                    // A weekday qualifier may follow, either as bare
                    // codes or as a full weekly rule.
                    if cursor.next_is_one_of(&WEEKDAY_CODES) {
                        rule.day_in_week = Some(decode_weekdays(&mut cursor)?);
                        read_count_and_end(&mut cursor, rule, false)?;
                    } else if cursor.has_more() {
                        decode_inner(rule, cursor.remainder(), false)?;
                    }
                }
                _ => return None,
            }
        }
        'Y' => {
            if is_top {
                rule.frequency = Some(Frequency::Yearly);
            }
            match cursor.read_char()? {
                'D' => {
                    let interval = cursor.read_int()?;
                    if is_top {
                        rule.interval = Some(interval);
                    }
                    cursor.skip_blank();
                    rule.day_in_year = Some(cursor.read_int()?);
                    read_count_and_end(&mut cursor, rule, is_top)?;
                }
                'M' => {
                    let interval = cursor.read_int()?;
                    if is_top {
                        rule.interval = Some(interval);
                    }
                    rule.month_in_year = Some(decode_months(&mut cursor)?);
                    read_count_and_end(&mut cursor, rule, is_top)?;
                    cursor.skip_blank();
                    if cursor.has_more() {
                        decode_inner(rule, cursor.remainder(), false)?;
                    }
                }
                _ => return None,
            }
        }
        _ => return None,
    }
    Some(())
}

fn decode_weekdays(cursor: &mut Cursor<'_>) -> Option<u32> {
    let mut mask = 0;
    loop {
        cursor.skip_blank();
        if !cursor.next_is_one_of(&WEEKDAY_CODES) {
            break;
        }
        let code = cursor.read_id()?;
        let i = WEEKDAY_CODES.iter().position(|&c| c == code)?;
        mask |= WEEKDAY_FLAGS[i];
    }
    Some(mask)
}

fn decode_weeks(cursor: &mut Cursor<'_>) -> Option<u32> {
    let mut mask = 0;
    loop {
        cursor.skip_blank();
        if !cursor.next_is_one_of(&WEEK_CODES) {
            break;
        }
        let code = cursor.read_id()?;
        let i = WEEK_CODES.iter().position(|&c| c == code)?;
        mask |= WEEK_FLAGS[i];
    }
    Some(mask)
}

fn decode_months(cursor: &mut Cursor<'_>) -> Option<u32> {
    let mut mask = 0;
    loop {
        cursor.skip_blank();
        if !cursor.next_is_int() {
            break;
        }
        let number = cursor.read_int()?;
        if number > 12 {
            return None;
        }
        // Month 0 is tolerated and contributes nothing.
        if let Some(i) = (number as usize).checked_sub(1) {
            mask |= MONTH_FLAGS[i];
        }
    }
    Some(mask)
}

/// Reads the optional `#count` and end-date suffix.
///
/// The count is stored only at the top level and only when positive
/// (`#0` means forever). The end date is stored only at the top level
/// but must still parse wherever it appears.
fn read_count_and_end(cursor: &mut Cursor<'_>, rule: &mut RepeatRule, is_top: bool) -> Option<()> {
    cursor.skip_blank();
    if cursor.matches('#') {
        cursor.skip();
        let count = cursor.read_int()?;
        if is_top && count > 0 {
            rule.count = Some(count);
        }
    }
    cursor.skip_blank();
    if let Some(date) = cursor.read_date() {
        let stamp = if date.len() < 15 {
            time::parse_date(date).ok()?
        } else {
            time::parse_date_time(date).ok()?
        };
        if is_top {
            rule.end = Some(stamp);
        }
    }
    Some(())
}

/// Encodes a rule, or `None` when it has no wire representation
/// (no frequency, or a MONTHLY/YEARLY rule without a qualifier).
///
/// `start_freq` selects the frequency for a nested tail; `None` means
/// the outermost call, which alone writes interval, count and end.
/// The count and end date go before any tail so that a re-decode
/// attributes them to the top level.
#[must_use]
pub fn encode(rule: &RepeatRule, start_freq: Option<Frequency>) -> Option<String> {
    rule.frequency?;
    let is_top = start_freq.is_none();
    let frequency = start_freq.or(rule.frequency)?;

    let interval = if is_top { rule.interval_or_default() } else { 1 };
    let mut suffix = match rule.count.filter(|_| is_top) {
        Some(count) => format!(" #{count}"),
        None => " #0".to_string(), // forever
    };
    if is_top && let Some(end) = rule.end {
        suffix.push(' ');
        suffix.push_str(&time::compose_date_time(end));
    }

    let mut out = String::new();
    match frequency {
        Frequency::Daily => {
            out.push('D');
            out.push_str(&interval.to_string());
            out.push_str(&suffix);
        }
        Frequency::Weekly => {
            out.push('W');
            out.push_str(&interval.to_string());
            if let Some(mask) = rule.day_in_week {
                encode_codes(&mut out, mask, &WEEKDAY_FLAGS, &WEEKDAY_CODES);
            }
            out.push_str(&suffix);
        }
        Frequency::Monthly => {
            if let Some(day) = rule.day_in_month {
                out.push_str("MD");
                out.push_str(&interval.to_string());
                out.push(' ');
                out.push_str(&day.to_string());
                out.push_str(&suffix);
            } else if let Some(mask) = rule.week_in_month {
                out.push_str("MP");
                out.push_str(&interval.to_string());
                encode_codes(&mut out, mask, &WEEK_FLAGS, &WEEK_CODES);
                out.push_str(&suffix);
                if let Some(days) = rule.day_in_week {
                    encode_codes(&mut out, days, &WEEKDAY_FLAGS, &WEEKDAY_CODES);
                }
            } else {
                return None;
            }
        }
        Frequency::Yearly => {
            if let Some(day) = rule.day_in_year {
                out.push_str("YD");
                out.push_str(&interval.to_string());
                out.push(' ');
                out.push_str(&day.to_string());
                out.push_str(&suffix);
            } else if let Some(mask) = rule.month_in_year {
                out.push_str("YM");
                out.push_str(&interval.to_string());
                for (i, &flag) in MONTH_FLAGS.iter().enumerate() {
                    if mask & flag != 0 {
                        out.push(' ');
                        out.push_str(&(i + 1).to_string());
                    }
                }
                out.push_str(&suffix);
                if rule.day_in_month.is_some() || rule.week_in_month.is_some() {
                    out.push(' ');
                    out.push_str(&encode(rule, Some(Frequency::Monthly))?);
                }
            } else {
                return None;
            }
        }
    }
    Some(out)
}

fn encode_codes(out: &mut String, mask: u32, flags: &[u32], codes: &[&str]) {
    for (i, &flag) in flags.iter().enumerate() {
        if mask & flag != 0 {
            out.push(' ');
            out.push_str(codes[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(text: &str) -> RepeatRule {
        let mut rule = RepeatRule::new();
        assert!(decode(&mut rule, text, true), "failed to decode {text:?}");
        rule
    }

    fn assert_round_trip(rule: &RepeatRule) {
        let text = encode(rule, None).expect("encodable");
        let mut again = RepeatRule::new();
        assert!(decode(&mut again, &text, true), "failed to re-decode {text:?}");
        assert_eq!(rule, &again, "round trip through {text:?}");
    }

    #[test]
    fn daily_forever() {
        let rule = decoded("D1 #0");
        assert_eq!(rule.frequency, Some(Frequency::Daily));
        assert_eq!(rule.interval, Some(1));
        assert_eq!(rule.count, None);
        assert_eq!(encode(&rule, None).as_deref(), Some("D1 #0"));
    }

    #[test]
    fn weekly_with_days_and_count() {
        let rule = decoded("W2 MO WE FR #5");
        assert_eq!(rule.frequency, Some(Frequency::Weekly));
        assert_eq!(rule.interval, Some(2));
        assert_eq!(
            rule.day_in_week,
            Some(weekday::MONDAY | weekday::WEDNESDAY | weekday::FRIDAY)
        );
        assert_eq!(rule.count, Some(5));
        assert_eq!(encode(&rule, None).as_deref(), Some("W2 MO WE FR #5"));
    }

    #[test]
    fn monthly_by_day() {
        let rule = decoded("MD1 15 #12");
        assert_eq!(rule.frequency, Some(Frequency::Monthly));
        assert_eq!(rule.day_in_month, Some(15));
        assert_eq!(rule.count, Some(12));
        assert_eq!(encode(&rule, None).as_deref(), Some("MD1 15 #12"));
    }

    #[test]
    fn monthly_by_position_with_weekday_tail() {
        let rule = decoded("MP1 1+ MO #0");
        assert_eq!(rule.frequency, Some(Frequency::Monthly));
        assert_eq!(rule.week_in_month, Some(week::FIRST));
        // The tail contributes its weekday mask without disturbing the
        // top-level frequency, interval or count.
        assert_eq!(rule.day_in_week, Some(weekday::MONDAY));
        assert_eq!(rule.interval, Some(1));
        assert_eq!(rule.count, None);
        assert_eq!(encode(&rule, None).as_deref(), Some("MP1 1+ #0 MO"));
        assert_round_trip(&rule);
    }

    #[test]
    fn monthly_by_position_accepts_full_weekly_tail() {
        let rule = decoded("MP1 2- #3 W1 TH #0");
        assert_eq!(rule.week_in_month, Some(week::SECOND_LAST));
        assert_eq!(rule.day_in_week, Some(weekday::THURSDAY));
        assert_eq!(rule.count, Some(3));
        assert_round_trip(&rule);
    }

    #[test]
    fn yearly_by_month_with_monthly_tail() {
        let rule = decoded("YM1 6 12 #0 MD1 24 #0");
        assert_eq!(rule.frequency, Some(Frequency::Yearly));
        assert_eq!(rule.month_in_year, Some(month::JUNE | month::DECEMBER));
        assert_eq!(rule.day_in_month, Some(24));
        assert_eq!(
            encode(&rule, None).as_deref(),
            Some("YM1 6 12 #0 MD1 24 #0")
        );
        assert_round_trip(&rule);
    }

    #[test]
    fn yearly_by_day() {
        let rule = decoded("YD1 100 #3");
        assert_eq!(rule.day_in_year, Some(100));
        assert_eq!(encode(&rule, None).as_deref(), Some("YD1 100 #3"));
    }

    #[test]
    fn end_date_round_trip() {
        let rule = decoded("D1 #0 20301231T000000Z");
        let end = rule.end.expect("end date");
        assert_eq!(time::compose_date_time(end), "20301231T000000Z");
        assert_eq!(
            encode(&rule, None).as_deref(),
            Some("D1 #0 20301231T000000Z")
        );
    }

    #[test]
    fn end_date_survives_a_tail() {
        let mut rule = decoded("MP1 1+ #0 20301231T000000Z MO");
        assert!(rule.end.is_some());
        assert_eq!(rule.day_in_week, Some(weekday::MONDAY));
        assert_round_trip(&rule);

        // Nested rules never take the end date.
        rule = decoded("MP1 1+ MO #0 20301231T000000Z");
        assert_eq!(rule.end, None);
    }

    #[test]
    fn rejects_malformed_rules() {
        for text in ["", "X5", "D", "MD1 #1", "MP1 6+ #1", "YM1 13 #1", "MQ1 #1", "W2 MO #"] {
            let mut rule = RepeatRule::new();
            assert!(!decode(&mut rule, text, true), "accepted {text:?}");
        }
    }

    #[test]
    fn trailing_garbage_is_ignored_without_a_tail() {
        let rule = decoded("D2 #4 whatever");
        assert_eq!(rule.interval, Some(2));
        assert_eq!(rule.count, Some(4));
    }

    #[test]
    fn non_ascii_trailing_garbage_is_not_a_date() {
        let rule = decoded("D1 #1 aééééé");
        assert_eq!(rule.count, Some(1));
        assert_eq!(rule.end, None);
    }

    #[test]
    fn count_zero_means_forever() {
        let rule = decoded("W1 SA #0");
        assert_eq!(rule.count, None);
    }

    #[test]
    fn encode_requires_frequency_and_qualifiers() {
        assert_eq!(encode(&RepeatRule::new(), None), None);

        let mut bare_monthly = RepeatRule::new();
        bare_monthly.frequency = Some(Frequency::Monthly);
        assert_eq!(encode(&bare_monthly, None), None);

        let mut bare_yearly = RepeatRule::new();
        bare_yearly.frequency = Some(Frequency::Yearly);
        assert_eq!(encode(&bare_yearly, None), None);
    }
}
