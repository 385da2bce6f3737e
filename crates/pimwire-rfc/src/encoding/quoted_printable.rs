//! Quoted-Printable decoding (RFC 2045 §6.7).
//!
//! The decoder is deliberately forgiving: unrepresentable characters
//! are dropped, a failed `=XY` escape is passed through literally, and
//! trailing whitespace before a line break or escape is right-trimmed.
//! Hard line breaks are emitted as CRLF, the codec's wire line break.

/// Decodes Quoted-Printable text into bytes.
#[must_use]
pub fn decode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    // Space/tab run waiting to learn whether it precedes real content
    // (flush) or a line break / escape (discard).
    let mut pending_ws: Vec<u8> = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '=' => {
                pending_ws.clear();
                decode_escape(&mut chars, &mut out);
            }
            '\r' => {
                pending_ws.clear();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.extend_from_slice(b"\r\n");
            }
            ' ' | '\t' => pending_ws.push(c as u8),
            _ if (c as u32) < 32 || (c as u32) > 126 => {
                // Controls other than TAB/CR and anything past ASCII
                // printable range are dropped.
            }
            _ => {
                out.append(&mut pending_ws);
                out.push(c as u8);
            }
        }
    }

    out.append(&mut pending_ws);
    out
}

/// Handles the character(s) following `=`: a soft line break, a hex
/// escape, or (on failure) the literal text.
fn decode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut Vec<u8>) {
    // Soft line break: =CRLF is consumed and emits nothing.
    if chars.peek() == Some(&'\r') {
        chars.next();
        if chars.peek() == Some(&'\n') {
            chars.next();
        }
        return;
    }

    let Some(hi) = chars.next() else {
        out.push(b'=');
        return;
    };
    let Some(lo) = chars.next() else {
        out.push(b'=');
        push_char(out, hi);
        return;
    };

    match (hi.to_digit(16), lo.to_digit(16)) {
        (Some(h), Some(l)) => out.push(((h << 4) | l) as u8),
        _ => {
            // Not a hex pair; keep the literal =XY.
            out.push(b'=');
            push_char(out, hi);
            push_char(out, lo);
        }
    }
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
