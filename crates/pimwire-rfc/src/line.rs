//! Property-line grammar.
//!
//! One logical line decomposes into `NAME[;ATTR[=VAL]]*:VALUE`. The
//! grammar is shared by every record codec; the end-of-record matcher
//! is also used by the host's folding reader to find where a record's
//! raw text stops.

use crate::error::{FormatError, FormatResult};

/// A decomposed property line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    /// Property name, upper-cased, group prefix removed.
    pub name: String,
    /// Attribute tokens in order of appearance, upper-cased.
    pub attributes: Vec<String>,
    /// Raw value text (everything after the first colon), trimmed.
    pub value: String,
}

impl PropertyLine {
    /// Splits a logical line into name, attributes and value.
    ///
    /// ## Errors
    /// Returns `FormatError::InvalidLine` when the line has no colon or
    /// the colon is its first character.
    pub fn parse(line: &str) -> FormatResult<Self> {
        let colon = match line.find(':') {
            Some(0) | None => return Err(FormatError::invalid_line(line)),
            Some(i) => i,
        };

        let value = line[colon + 1..].trim().to_string();
        let prefix = line[..colon].trim();

        let mut tokens = prefix.split(';').map(str::to_ascii_uppercase);
        let mut name = tokens.next().unwrap_or_default();
        let attributes: Vec<String> = tokens.collect();

        // A group prefix (e.g. HOME.FN) carries no meaning here; drop it.
        if let Some(dot) = name.rfind('.') {
            name.drain(..=dot);
        }

        Ok(Self {
            name,
            attributes,
            value,
        })
    }
}

/// Recognizes `END : KEYWORD` lines, case-insensitively, allowing
/// blanks around the colon. The trailing token must match the keyword
/// exactly with nothing after it.
///
/// This is a purely syntactic test; it does not consume the line.
#[must_use]
pub fn is_end_of_record(line: &str, keyword: &str) -> bool {
    let trimmed = line.trim_matches([' ', '\t']);
    let Some(rest) = strip_prefix_ignore_case(trimmed, "END") else {
        return false;
    };
    let rest = rest.trim_start_matches([' ', '\t']);
    let Some(rest) = rest.strip_prefix(':') else {
        return false;
    };
    rest.trim_matches([' ', '\t']).eq_ignore_ascii_case(keyword)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    {
        // A matched ASCII prefix leaves the split on a char boundary.
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_line() {
        let line = PropertyLine::parse("FN:John Smith").unwrap();
        assert_eq!(line.name, "FN");
        assert!(line.attributes.is_empty());
        assert_eq!(line.value, "John Smith");
    }

    #[test]
    fn parse_attributes_uppercased() {
        let line = PropertyLine::parse("TEL;home;type=fax:555-0100").unwrap();
        assert_eq!(line.name, "TEL");
        assert_eq!(line.attributes, vec!["HOME", "TYPE=FAX"]);
        assert_eq!(line.value, "555-0100");
    }

    #[test]
    fn parse_drops_group_prefix() {
        let line = PropertyLine::parse("item1.EMAIL:a@b.example").unwrap();
        assert_eq!(line.name, "EMAIL");
    }

    #[test]
    fn parse_value_keeps_interior_colons() {
        let line = PropertyLine::parse("URL:https://example.com:8080/x").unwrap();
        assert_eq!(line.value, "https://example.com:8080/x");
    }

    #[test]
    fn parse_rejects_missing_or_leading_colon() {
        assert!(PropertyLine::parse("NOCOLON").is_err());
        assert!(PropertyLine::parse(":VALUE").is_err());
    }

    #[test]
    fn end_matcher_basic() {
        assert!(is_end_of_record("END:VCARD", "VCARD"));
        assert!(is_end_of_record("end:vcard", "VCARD"));
        assert!(is_end_of_record("  END \t:  VCARD  ", "VCARD"));
    }

    #[test]
    fn end_matcher_handles_non_ascii_lines() {
        assert!(!is_end_of_record("ééé", "VCARD"));
        assert!(!is_end_of_record("é:VCARD", "VCARD"));
    }

    #[test]
    fn end_matcher_rejects_trailing_garbage() {
        assert!(!is_end_of_record("END:VCARDX", "VCARD"));
        assert!(!is_end_of_record("END:VCARD extra", "VCARD"));
        assert!(!is_end_of_record("FRIEND:VCARD", "VCARD"));
        assert!(!is_end_of_record("END:VEVENT", "VCARD"));
    }
}
