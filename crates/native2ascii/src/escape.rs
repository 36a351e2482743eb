//! Resolution of the four hex digits that follow `\u`.
//!
//! [`UnicodeEscape::resolve`] is pure: it looks at exactly four bytes and
//! classifies the code point they spell. It never fails; digits that do not
//! form a usable character are reported as [`UnicodeEscape::Invalid`] and the
//! decoder reproduces the token literally.
//!
//! Two classes of well-formed escapes are still kept apart from ordinary
//! characters:
//!
//! - whitespace, see [`is_guarded_whitespace`]. Escapes such as `\u0020` are
//!   reproduced literally unless the decoder is configured otherwise.
//! - UTF-16 surrogates. A high surrogate only becomes a character together
//!   with a following low-surrogate escape.

/// Classification of a `\uXXXX` escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeEscape {
    /// A character that can be emitted directly.
    Char(char),
    /// A character in the guarded whitespace set.
    Whitespace(char),
    /// The leading half (U+D800..=U+DBFF) of a surrogate pair.
    HighSurrogate(u16),
    /// The trailing half (U+DC00..=U+DFFF) of a surrogate pair.
    LowSurrogate(u16),
    /// At least one of the four bytes is not an ASCII hex digit.
    Invalid,
}

impl UnicodeEscape {
    /// Resolves the four bytes following `\u`, most significant nibble first.
    #[must_use]
    pub fn resolve(digits: [u8; 4]) -> Self {
        let Some(unit) = code_unit(digits) else {
            return Self::Invalid;
        };
        match unit {
            0xD800..=0xDBFF => Self::HighSurrogate(unit),
            0xDC00..=0xDFFF => Self::LowSurrogate(unit),
            _ => match char::from_u32(u32::from(unit)) {
                Some(ch) if is_guarded_whitespace(ch) => Self::Whitespace(ch),
                Some(ch) => Self::Char(ch),
                None => Self::Invalid,
            },
        }
    }
}

/// Combines four ASCII hex digits into a UTF-16 code unit.
#[must_use]
pub fn code_unit(digits: [u8; 4]) -> Option<u16> {
    digits
        .into_iter()
        .try_fold(0u16, |acc, b| Some((acc << 4) | hex_val(b)?))
}

/// Joins a surrogate pair into the supplementary character it encodes.
#[must_use]
pub fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let scalar = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(scalar)
}

/// Whitespace that a `\u` escape is not allowed to produce by default.
///
/// This is the classic JVM whitespace set restricted to the BMP: the ASCII
/// controls `\t` `\n` `\u000B` `\f` `\r`, the information separators
/// U+001C..=U+001F, and the Unicode space, line and paragraph separators
/// except the no-break spaces U+00A0, U+2007 and U+202F.
#[must_use]
pub fn is_guarded_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\u{0009}'..='\u{000D}'
            | '\u{001C}'..='\u{001F}'
            | '\u{0020}'
            | '\u{1680}'
            | '\u{2000}'..='\u{2006}'
            | '\u{2008}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Convert a single ASCII hex digit into its 0..=15 value.
#[inline]
fn hex_val(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{UnicodeEscape, code_unit, combine_surrogates, is_guarded_whitespace};

    #[test]
    fn basic_decoding() {
        assert_eq!(UnicodeEscape::resolve(*b"0041"), UnicodeEscape::Char('A'));
    }

    #[test]
    fn mixed_case_hex() {
        assert_eq!(
            UnicodeEscape::resolve(*b"AbCd"),
            UnicodeEscape::Char('\u{ABCD}')
        );
        assert_eq!(code_unit(*b"abcd"), code_unit(*b"ABCD"));
    }

    #[rstest]
    #[case(*b"00G1")]
    #[case(*b"0x41")]
    #[case(*b" 041")]
    #[case(*b"004\\")]
    #[case([b'0', b'0', 0xC3, 0xA9])]
    fn invalid_hex_is_invalid(#[case] digits: [u8; 4]) {
        assert_eq!(UnicodeEscape::resolve(digits), UnicodeEscape::Invalid);
        assert_eq!(code_unit(digits), None);
    }

    #[rstest]
    #[case(*b"0020", ' ')]
    #[case(*b"0009", '\t')]
    #[case(*b"000a", '\n')]
    #[case(*b"000D", '\r')]
    #[case(*b"001F", '\u{1F}')]
    #[case(*b"2003", '\u{2003}')]
    #[case(*b"2028", '\u{2028}')]
    #[case(*b"3000", '\u{3000}')]
    fn whitespace_is_classified(#[case] digits: [u8; 4], #[case] ch: char) {
        assert_eq!(UnicodeEscape::resolve(digits), UnicodeEscape::Whitespace(ch));
    }

    #[rstest]
    #[case('\u{00A0}')]
    #[case('\u{2007}')]
    #[case('\u{202F}')]
    #[case('\u{0085}')]
    #[case('x')]
    fn no_break_spaces_are_not_guarded(#[case] ch: char) {
        assert!(!is_guarded_whitespace(ch));
    }

    #[test]
    fn surrogates_are_classified() {
        assert_eq!(
            UnicodeEscape::resolve(*b"D83D"),
            UnicodeEscape::HighSurrogate(0xD83D)
        );
        assert_eq!(
            UnicodeEscape::resolve(*b"de00"),
            UnicodeEscape::LowSurrogate(0xDE00)
        );
    }

    #[test]
    fn surrogate_pair_combines() {
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), Some('😀'));
        assert_eq!(combine_surrogates(0xD800, 0xDC00), Some('\u{10000}'));
        assert_eq!(combine_surrogates(0xDBFF, 0xDFFF), Some('\u{10FFFF}'));
        assert_eq!(combine_surrogates(0xDE00, 0xD83D), None);
        assert_eq!(combine_surrogates(0x0041, 0xDC00), None);
    }

    #[test]
    fn nul_and_max_bmp_resolve() {
        assert_eq!(UnicodeEscape::resolve(*b"0000"), UnicodeEscape::Char('\0'));
        assert_eq!(
            UnicodeEscape::resolve(*b"FFFF"),
            UnicodeEscape::Char('\u{FFFF}')
        );
    }
}
