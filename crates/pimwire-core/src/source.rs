//! Logical-line input boundary.
//!
//! Physical line folding and record framing detection belong to the
//! host's reader; the codecs only consume logical, already-unfolded
//! property lines through this trait.

/// Sequential supplier of logical property lines.
pub trait LineSource {
    /// Next logical line, or `None` at end of stream.
    fn read_logical_line(&mut self) -> Option<String>;
}

/// A `LineSource` over pre-unfolded text, splitting on CRLF or LF.
///
/// Blank lines are skipped; this adapter performs no unfolding.
#[derive(Debug)]
pub struct StrLineSource<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrLineSource<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
        }
    }
}

impl LineSource for StrLineSource<'_> {
    fn read_logical_line(&mut self) -> Option<String> {
        self.lines
            .by_ref()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .find(|l| !l.trim().is_empty())
            .map(String::from)
    }
}
