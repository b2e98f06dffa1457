//! Escape-sequence dictionaries for the 7-bit stateful encodings.

use crate::charset::Charset;

/// What a matched sequence means for its encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeRole {
    /// Designates a character set; decisive on its own.
    Designate,
    /// Enters a double-byte run (HZ `~{`).
    ShiftIn,
    /// Leaves a double-byte run (HZ `~}`); decisive after a shift-in.
    ShiftOut,
    /// Valid in the encoding but says nothing about it (HZ `~~`).
    Literal,
}

/// A fixed byte sequence and what it signals.
#[derive(Clone, Copy, Debug)]
pub struct EscapeSequence {
    /// The raw bytes, starting with ESC or `~`.
    pub bytes: &'static [u8],
    /// The encoding the sequence belongs to.
    pub charset: Charset,
    /// How the sequence is interpreted.
    pub role: EscapeRole,
}

const ESC: u8 = 0x1B;

const fn seq(bytes: &'static [u8], charset: Charset, role: EscapeRole) -> EscapeSequence {
    EscapeSequence {
        bytes,
        charset,
        role,
    }
}

/// Encodings covered by [`ESCAPE_SEQUENCES`], in priority order.
pub const ESCAPE_CHARSETS: [Charset; 4] = [
    Charset::Iso2022Jp,
    Charset::Iso2022Kr,
    Charset::Iso2022Cn,
    Charset::HzGb2312,
];

/// The full dictionary. No entry is a prefix of another.
pub static ESCAPE_SEQUENCES: [EscapeSequence; 25] = {
    use Charset::{HzGb2312, Iso2022Cn, Iso2022Jp, Iso2022Kr};
    use EscapeRole::{Designate, Literal, ShiftIn, ShiftOut};
    [
        // ISO-2022-JP (RFC 1468) and its JIS X 0212/0213 extensions.
        seq(&[ESC, b'(', b'B'], Iso2022Jp, Designate),
        seq(&[ESC, b'(', b'J'], Iso2022Jp, Designate),
        seq(&[ESC, b'(', b'I'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'@'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'B'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'(', b'D'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'(', b'O'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'(', b'P'], Iso2022Jp, Designate),
        seq(&[ESC, b'$', b'(', b'Q'], Iso2022Jp, Designate),
        seq(&[ESC, b'&', b'@'], Iso2022Jp, Designate),
        // ISO-2022-KR (RFC 1557).
        seq(&[ESC, b'$', b')', b'C'], Iso2022Kr, Designate),
        // ISO-2022-CN (RFC 1922).
        seq(&[ESC, b'$', b')', b'A'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b')', b'G'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b')', b'E'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'*', b'H'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'+', b'I'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'+', b'J'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'+', b'K'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'+', b'L'], Iso2022Cn, Designate),
        seq(&[ESC, b'$', b'+', b'M'], Iso2022Cn, Designate),
        // HZ (RFC 1843).
        seq(b"~{", HzGb2312, ShiftIn),
        seq(b"~}", HzGb2312, ShiftOut),
        seq(b"~~", HzGb2312, Literal),
        seq(b"~\n", HzGb2312, Literal),
        seq(b"~\r", HzGb2312, Literal),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entry_prefixes_another() {
        for a in &ESCAPE_SEQUENCES {
            for b in &ESCAPE_SEQUENCES {
                if !std::ptr::eq(a, b) {
                    assert!(!b.bytes.starts_with(a.bytes), "{:?} / {:?}", a.bytes, b.bytes);
                }
            }
        }
    }

    #[test]
    fn test_every_entry_names_a_listed_charset() {
        for s in &ESCAPE_SEQUENCES {
            assert!(ESCAPE_CHARSETS.contains(&s.charset));
            assert!(s.bytes.len() >= 2);
        }
    }
}
