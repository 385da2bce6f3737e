//! Lenient Base64 transform (RFC 2045 alphabet).
//!
//! Device-originated payloads arrive with stray whitespace, folds and
//! the odd truncated tail, so the decoder skips anything outside the
//! alphabet and silently drops malformed trailing fragments instead of
//! failing. The encoder wraps between 4-character groups with a
//! configurable line length and indent, matching how binary property
//! values are laid out under a folded property line.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: char = '=';

fn sextet(c: char) -> Option<u32> {
    match c {
        'A'..='Z' => Some(c as u32 - 'A' as u32),
        'a'..='z' => Some(c as u32 - 'a' as u32 + 26),
        '0'..='9' => Some(c as u32 - '0' as u32 + 52),
        '+' => Some(62),
        '/' => Some(63),
        _ => None,
    }
}

/// Decodes Base64 text into bytes.
///
/// Characters outside the alphabet are skipped. The first padding
/// character ends decoding: at group position 2 the group yields no
/// bytes, at position 3 it yields one. A trailing fragment with fewer
/// than 2 significant characters yields nothing.
#[must_use]
pub fn decode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() / 4 * 3);
    let mut acc: u32 = 0;
    let mut have = 0usize;

    for c in text.chars() {
        if c == PAD {
            break;
        }
        let Some(bits) = sextet(c) else {
            continue;
        };
        acc = (acc << 6) | bits;
        have += 1;
        if have == 4 {
            out.push((acc >> 16) as u8);
            out.push((acc >> 8) as u8);
            out.push(acc as u8);
            acc = 0;
            have = 0;
        }
    }

    // Partial final group: 2 chars carry 1 byte, 3 chars carry 2.
    match have {
        2 => out.push((acc >> 4) as u8),
        3 => {
            out.push((acc >> 10) as u8);
            out.push((acc >> 2) as u8);
        }
        _ => {}
    }

    out
}

/// Encodes bytes as Base64, wrapped at `line_length` with `indent`
/// leading spaces on every line.
///
/// Wrapping happens only between 4-character groups: a CRLF plus the
/// indent is inserted whenever the next group would push the current
/// line to `line_length` or beyond.
#[must_use]
pub fn encode(data: &[u8], line_length: usize, indent: usize) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4 + indent);
    for _ in 0..indent {
        out.push(' ');
    }
    let mut line_len = indent;

    for chunk in data.chunks(3) {
        if line_len + 4 >= line_length && line_len > indent {
            out.push_str("\r\n");
            for _ in 0..indent {
                out.push(' ');
            }
            line_len = indent;
        }

        let b0 = u32::from(chunk[0]);
        let b1 = chunk.get(1).copied().map_or(0, u32::from);
        let b2 = chunk.get(2).copied().map_or(0, u32::from);
        let group = (b0 << 16) | (b1 << 8) | b2;

        out.push(ALPHABET[(group >> 18) as usize & 0x3f] as char);
        out.push(ALPHABET[(group >> 12) as usize & 0x3f] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[(group >> 6) as usize & 0x3f] as char
        } else {
            PAD
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[group as usize & 0x3f] as char
        } else {
            PAD
        });
        line_len += 4;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert!(decode("").is_empty());
        assert!(decode("Q").is_empty());
    }

    #[test]
    fn decode_skips_foreign_characters() {
        assert_eq!(decode("SGVs\r\n    bG8="), b"Hello");
        assert_eq!(decode("S G V s b G 8 ="), b"Hello");
    }

    #[test]
    fn decode_truncated_tail() {
        // "SGVsbG8" = full group + 3 significant chars -> "Hell" + 'o'
        assert_eq!(decode("SGVsbG8"), b"Hello");
        // One significant trailing char carries under 8 bits; dropped.
        assert_eq!(decode("SGVsb"), b"Hel");
    }

    #[test]
    fn decode_pad_at_position_two() {
        // Pad right after one significant char: the group emits nothing.
        assert_eq!(decode("SGVsQ==="), b"Hel");
    }

    #[test]
    fn round_trip_all_byte_values() {
        let data: Vec<u8> = (0..=255).collect();
        for line_length in [4, 16, 76] {
            let encoded = encode(&data, line_length, 0);
            assert_eq!(decode(&encoded), data);
        }
    }

    #[test]
    fn round_trip_with_indent() {
        let data = b"binary payload with some length to force wrapping";
        let encoded = encode(data, 20, 4);
        assert!(encoded.starts_with("    "));
        for line in encoded.split("\r\n") {
            assert!(line.starts_with("    "));
            assert!(line.len() <= 20 + 4);
        }
        assert_eq!(decode(&encoded), data);
    }

    #[test]
    fn encode_matches_registry_engine_on_clean_input() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let ours: String = encode(data, usize::MAX, 0);
        assert_eq!(ours, STANDARD.encode(data));
    }

    #[test]
    fn decode_matches_registry_engine_on_clean_input() {
        let text = STANDARD.encode([0u8, 1, 2, 250, 251, 252]);
        assert_eq!(decode(&text), vec![0u8, 1, 2, 250, 251, 252]);
    }
}
