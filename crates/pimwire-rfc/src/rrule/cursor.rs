//! Character cursor for the recurrence-rule grammar.
//!
//! The grammar is ASCII throughout, so the cursor indexes bytes.
//! Every reader returns `Option`; `None` means the rule text is
//! malformed at the current position and the whole rule is rejected.

/// A position in a rule string.
#[derive(Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pos < self.text.len()
    }

    /// Unconsumed tail of the rule text.
    #[must_use]
    pub fn remainder(&self) -> &'a str {
        &self.text[self.pos.min(self.text.len())..]
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// Consumes and returns the next character.
    pub fn read_char(&mut self) -> Option<char> {
        let b = self.byte_at(0)?;
        self.pos += 1;
        Some(b as char)
    }

    /// True when the next character equals `c` without consuming it.
    #[must_use]
    pub fn matches(&self, c: char) -> bool {
        self.byte_at(0) == Some(c as u8)
    }

    pub fn skip(&mut self) {
        self.pos += 1;
    }

    pub fn skip_blank(&mut self) {
        while self.matches(' ') || self.matches('\t') {
            self.skip();
        }
    }

    /// Consumes `c`; `None` if the next character differs.
    pub fn match_skip(&mut self, c: char) -> Option<()> {
        if self.matches(c) {
            self.skip();
            Some(())
        } else {
            None
        }
    }

    /// Consumes a run of decimal digits.
    ///
    /// `None` when no digit is present or the value overflows.
    pub fn read_int(&mut self) -> Option<u32> {
        let mut value: u32 = 0;
        let mut seen = false;
        while let Some(b) = self.byte_at(0)
            && b.is_ascii_digit()
        {
            value = value
                .checked_mul(10)?
                .checked_add(u32::from(b - b'0'))?;
            self.pos += 1;
            seen = true;
        }
        seen.then_some(value)
    }

    /// Consumes the next space-delimited token.
    pub fn read_id(&mut self) -> Option<&'a str> {
        if !self.has_more() {
            return None;
        }
        let rest = self.remainder();
        let id = rest.split(' ').next().unwrap_or(rest);
        self.pos += id.len();
        Some(id)
    }

    /// True when the next token is one of the given codes.
    #[must_use]
    pub fn next_is_one_of(&self, codes: &[&str]) -> bool {
        let rest = self.remainder();
        let id = rest.split(' ').next().unwrap_or(rest);
        !id.is_empty() && codes.contains(&id)
    }

    /// True when the next token starts with a digit.
    #[must_use]
    pub fn next_is_int(&self) -> bool {
        self.byte_at(0).is_some_and(|b| b.is_ascii_digit())
    }

    /// Consumes a `yyyyMMdd`, `yyyyMMddTHHmmss` or `yyyyMMddTHHmmssZ`
    /// date token, validating year (>= 1970), month and day. The time
    /// part is not validated.
    ///
    /// `None` leaves the cursor where it was.
    pub fn read_date(&mut self) -> Option<&'a str> {
        let rest = self.remainder();
        let bytes = rest.as_bytes();
        if bytes.len() < 8 || !bytes[..8].iter().all(u8::is_ascii_digit) {
            return None;
        }
        let mut len = 8;
        if bytes.len() > 14 && bytes[8] == b'T' {
            len = 15;
            if bytes.len() > 15 && bytes[15] == b'Z' {
                len = 16;
            }
        }
        // The tail may hold arbitrary text, multi-byte included.
        if !rest.is_char_boundary(len) {
            return None;
        }
        let date = &rest[..len];
        let year: u32 = date[0..4].parse().ok()?;
        if year < 1970 {
            return None;
        }
        let month: u32 = date[4..6].parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        let day: u32 = date[6..8].parse().ok()?;
        if !(1..=31).contains(&day) {
            return None;
        }
        self.pos += len;
        Some(date)
    }
}
