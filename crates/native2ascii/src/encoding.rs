//! Base encodings applied to the unescaped byte runs between escape tokens.
//!
//! A [`BaseEncoding`] is a narrow, stateless capability: given one contiguous
//! run of bytes it appends the decoded text. The decoder never splits a run
//! inside an escape-free region except at the end of the caller's input, where
//! [`BaseEncoding::incomplete_tail`] lets a multi-byte encoding hold back a
//! sequence that the next chunk will complete.

use alloc::string::String;
use core::convert::Infallible;

use bstr::ByteSlice;

use crate::error::MalformedInput;

/// Byte-run to text conversion used for everything outside escape tokens.
pub trait BaseEncoding {
    /// Failure reported for bytes the encoding cannot decode. The decoder
    /// passes it through to the caller untouched.
    type Error: core::error::Error;

    /// Human readable encoding label.
    fn name(&self) -> &'static str;

    /// Decodes `run` as a complete unit and appends the text to `out`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if `run` is not valid in this encoding.
    fn decode_run(&self, run: &[u8], out: &mut String) -> Result<(), Self::Error>;

    /// Length of a trailing, not yet complete multi-byte sequence in `run`
    /// that could still become valid once more bytes arrive.
    ///
    /// Single-byte encodings never hold anything back.
    fn incomplete_tail(&self, run: &[u8]) -> usize {
        let _ = run;
        0
    }
}

impl<E: BaseEncoding + ?Sized> BaseEncoding for &E {
    type Error = E::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn decode_run(&self, run: &[u8], out: &mut String) -> Result<(), Self::Error> {
        (**self).decode_run(run, out)
    }

    fn incomplete_tail(&self, run: &[u8]) -> usize {
        (**self).incomplete_tail(run)
    }
}

/// Strict UTF-8: any invalid sequence fails the decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl BaseEncoding for Utf8 {
    type Error = MalformedInput;

    fn name(&self) -> &'static str {
        "UTF-8"
    }

    fn decode_run(&self, run: &[u8], out: &mut String) -> Result<(), MalformedInput> {
        match core::str::from_utf8(run) {
            Ok(text) => {
                out.push_str(text);
                Ok(())
            }
            Err(e) => Err(MalformedInput {
                encoding: self.name(),
                valid_up_to: e.valid_up_to(),
                len: e.error_len().unwrap_or(run.len() - e.valid_up_to()),
            }),
        }
    }

    fn incomplete_tail(&self, run: &[u8]) -> usize {
        incomplete_utf8_tail(run)
    }
}

/// UTF-8 with U+FFFD substitution of maximal invalid subparts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8Lossy;

impl BaseEncoding for Utf8Lossy {
    type Error = Infallible;

    fn name(&self) -> &'static str {
        "UTF-8"
    }

    fn decode_run(&self, run: &[u8], out: &mut String) -> Result<(), Infallible> {
        out.push_str(&run.to_str_lossy());
        Ok(())
    }

    fn incomplete_tail(&self, run: &[u8]) -> usize {
        incomplete_utf8_tail(run)
    }
}

/// ISO-8859-1: every byte is the code point of the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latin1;

impl BaseEncoding for Latin1 {
    type Error = Infallible;

    fn name(&self) -> &'static str {
        "ISO-8859-1"
    }

    fn decode_run(&self, run: &[u8], out: &mut String) -> Result<(), Infallible> {
        out.extend(run.iter().copied().map(char::from));
        Ok(())
    }
}

/// Number of trailing bytes forming a valid but unfinished UTF-8 sequence.
fn incomplete_utf8_tail(run: &[u8]) -> usize {
    let floor = run.len().saturating_sub(3);
    for start in (floor..run.len()).rev() {
        let lead = run[start];
        if lead & 0xC0 == 0x80 {
            continue;
        }
        let needed = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return 0,
        };
        let have = run.len() - start;
        if have >= needed {
            return 0;
        }
        // Only a prefix the decoder would accept counts; `E0 80` is already bad.
        return match core::str::from_utf8(&run[start..]) {
            Err(e) if e.error_len().is_none() => have,
            _ => 0,
        };
    }
    0
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use rstest::rstest;

    use super::{BaseEncoding, Latin1, Utf8, Utf8Lossy, incomplete_utf8_tail};
    use crate::error::MalformedInput;

    #[rstest]
    #[case(b"", 0)]
    #[case(b"abc", 0)]
    #[case(b"ab\xC3", 1)]
    #[case(b"\xC3\xA9", 0)]
    #[case(b"x\xE6\x97", 2)]
    #[case(b"\xE6\x97\xA5", 0)]
    #[case(b"\xF0\x9F\x98", 3)]
    #[case(b"\xF0\x9F", 2)]
    #[case(b"\xE0\x80", 0)]
    #[case(b"\xED\xA0", 0)]
    #[case(b"\xFF", 0)]
    #[case(b"\x80\x80\x80", 0)]
    fn utf8_tail_detection(#[case] run: &[u8], #[case] expected: usize) {
        assert_eq!(incomplete_utf8_tail(run), expected);
    }

    #[test]
    fn strict_utf8_decodes_valid_runs() {
        let mut out = String::new();
        Utf8.decode_run("grüße 日本".as_bytes(), &mut out).unwrap();
        assert_eq!(out, "grüße 日本");
    }

    #[test]
    fn strict_utf8_reports_offsets() {
        let mut out = String::new();
        let err = Utf8.decode_run(b"ok\xFFrest", &mut out).unwrap_err();
        assert_eq!(
            err,
            MalformedInput {
                encoding: "UTF-8",
                valid_up_to: 2,
                len: 1
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn strict_utf8_truncated_run_covers_tail() {
        let mut out = String::new();
        let err = Utf8.decode_run(b"a\xE6\x97", &mut out).unwrap_err();
        assert_eq!(err.valid_up_to, 1);
        assert_eq!(err.len, 2);
    }

    #[test]
    fn lossy_utf8_replaces_maximal_subparts() {
        let mut out = String::new();
        Utf8Lossy.decode_run(b"a\xF0\x9F\x98b\xFF", &mut out).unwrap();
        assert_eq!(out, "a\u{FFFD}b\u{FFFD}");
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        let mut out = String::new();
        Latin1.decode_run(b"caf\xE9 \xFF", &mut out).unwrap();
        assert_eq!(out, "café ÿ");
        assert_eq!(Latin1.incomplete_tail(b"\xC3"), 0);
    }

    #[test]
    fn borrowed_encoding_delegates() {
        let enc = &Utf8Lossy;
        let mut out = String::new();
        enc.decode_run(b"x", &mut out).unwrap();
        assert_eq!(out, "x");
        assert_eq!(enc.name(), "UTF-8");
        assert_eq!(enc.incomplete_tail(b"\xC3"), 1);
    }
}
