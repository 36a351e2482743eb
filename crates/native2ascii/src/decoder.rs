//! The incremental scan engine.
//!
//! Overview
//! - Input arrives as arbitrary byte chunks through a [`ByteCursor`]. Runs of
//!   bytes between escape tokens go through the [`BaseEncoding`]; escape
//!   tokens are resolved here. Both end up in the staging buffer, which is
//!   then drained into the caller's [`CharBuf`].
//! - The staging buffer is the only state kept between calls. An escape token
//!   (or a multi-byte base sequence) that is cut by the end of the input is
//!   never consumed partially: the cursor is left in front of it and the
//!   caller resupplies those bytes together with the next chunk.
//!
//! Escape tokens
//! - `\uXXXX` with four ASCII hex digits resolves to one character.
//! - `\uD83D\uDE00` (a high surrogate directly followed by a low surrogate)
//!   resolves to one supplementary character.
//! - Invalid digits, unpaired surrogates and guarded whitespace
//!   ([`is_guarded_whitespace`](crate::is_guarded_whitespace)) are copied
//!   literally, one `char` per byte.
//! - `\` followed by any other byte is copied as the backslash plus that
//!   byte widened to a `char`.
//!
//! Results
//! - [`CoderResult::Overflow`]: decoded characters are still staged; call
//!   again (or [`flush`](Native2AsciiDecoder::flush)) with room in the
//!   destination.
//! - [`CoderResult::Underflow`]: every consumable byte was consumed and all
//!   of it delivered.

use alloc::string::String;

use tracing::{debug, trace};

use crate::{
    cursor::{ByteCursor, CharBuf},
    encoding::BaseEncoding,
    escape::{UnicodeEscape, combine_surrogates},
    options::DecoderOptions,
    staging::StagingBuffer,
};

const BACKSLASH: u8 = b'\\';

/// Length of `\uXXXX`.
const UNICODE_TOKEN_LEN: usize = 6;

/// Status of a [`Native2AsciiDecoder`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoderResult {
    /// All consumable input was consumed and delivered; more input is needed
    /// to make progress.
    Underflow,
    /// The destination filled up while decoded characters were still staged.
    Overflow,
}

impl CoderResult {
    /// Returns `true` for [`CoderResult::Underflow`].
    #[must_use]
    pub fn is_underflow(self) -> bool {
        matches!(self, Self::Underflow)
    }

    /// Returns `true` for [`CoderResult::Overflow`].
    #[must_use]
    pub fn is_overflow(self) -> bool {
        matches!(self, Self::Overflow)
    }
}

enum Token {
    /// This many bytes from the backslash on were consumed.
    Consumed(usize),
    /// The token continues past the end of the input.
    Incomplete,
}

/// Incremental decoder for one escaped byte stream.
///
/// An instance belongs to exactly one stream. Call [`reset`](Self::reset)
/// before reusing it for an unrelated stream.
///
/// ```rust
/// use native2ascii::{ByteCursor, CharBuf, CoderResult, Native2AsciiDecoder, Utf8};
///
/// let mut decoder = Native2AsciiDecoder::new(Utf8);
/// let mut storage = ['\0'; 16];
///
/// // The escape is split between the two chunks.
/// let mut input = ByteCursor::new(br"key=caf\u00");
/// let mut out = CharBuf::new(&mut storage);
/// assert_eq!(decoder.decode(&mut input, &mut out)?, CoderResult::Underflow);
/// assert_eq!(input.unconsumed(), br"\u00");
///
/// let mut next = input.unconsumed().to_vec();
/// next.extend_from_slice(b"e9!");
/// let mut input = ByteCursor::new(&next);
/// assert_eq!(decoder.decode(&mut input, &mut out)?, CoderResult::Underflow);
/// assert_eq!(decoder.flush(&mut out), CoderResult::Underflow);
///
/// assert_eq!(out.written().iter().collect::<String>(), "key=café!");
/// # Ok::<(), native2ascii::MalformedInput>(())
/// ```
#[derive(Debug)]
pub struct Native2AsciiDecoder<E: BaseEncoding> {
    encoding: E,
    options: DecoderOptions,
    staging: StagingBuffer,
    // Reused output buffer for the base encoding.
    scratch: String,
}

impl<E: BaseEncoding + Default> Default for Native2AsciiDecoder<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: BaseEncoding> Native2AsciiDecoder<E> {
    /// Creates a decoder with default [`DecoderOptions`].
    pub fn new(encoding: E) -> Self {
        Self::with_options(encoding, DecoderOptions::default())
    }

    /// Creates a decoder with explicit options.
    pub fn with_options(encoding: E, options: DecoderOptions) -> Self {
        Self {
            encoding,
            options,
            staging: StagingBuffer::new(),
            scratch: String::new(),
        }
    }

    /// The base encoding used for unescaped runs.
    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Number of decoded characters waiting for room in a destination.
    pub fn pending_chars(&self) -> usize {
        self.staging.len()
    }

    /// Decodes as much of `input` as is consumable into `output`.
    ///
    /// On return, `input`'s position is past everything consumed. Bytes left
    /// unconsumed form the start of an escape token or multi-byte sequence
    /// that the end of `input` cut short; supply them again, followed by more
    /// input, on the next call.
    ///
    /// # Errors
    ///
    /// Passes through the base encoding's error. The cursor then points at the
    /// start of the rejected run and characters decoded before it stay staged.
    pub fn decode(
        &mut self,
        input: &mut ByteCursor<'_>,
        output: &mut CharBuf<'_>,
    ) -> Result<CoderResult, E::Error> {
        self.decode_impl(input, output, false)
    }

    /// Like [`decode`](Self::decode), for the final input of the stream.
    ///
    /// Nothing is left unconsumed: a truncated escape at the end is copied
    /// literally and a truncated multi-byte sequence is handed to the base
    /// encoding as is. Follow up with [`flush`](Self::flush) until it reports
    /// [`CoderResult::Underflow`].
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn decode_last(
        &mut self,
        input: &mut ByteCursor<'_>,
        output: &mut CharBuf<'_>,
    ) -> Result<CoderResult, E::Error> {
        self.decode_impl(input, output, true)
    }

    /// Delivers staged characters without reading more input.
    pub fn flush(&mut self, output: &mut CharBuf<'_>) -> CoderResult {
        if self.staging.drain_into(output) {
            CoderResult::Underflow
        } else {
            CoderResult::Overflow
        }
    }

    /// Discards staged characters so the decoder can start a new stream.
    pub fn reset(&mut self) {
        debug!(discarded = self.staging.len(), "decoder reset");
        self.staging.clear();
        self.scratch.clear();
    }

    /// Decodes `bytes` as one complete stream.
    ///
    /// The decoder is reset first, so earlier state does not leak in.
    ///
    /// # Errors
    ///
    /// Passes through the base encoding's error.
    pub fn decode_to_string(&mut self, bytes: &[u8]) -> Result<String, E::Error> {
        self.reset();
        let mut input = ByteCursor::new(bytes);
        self.scan(&mut input, true)?;
        debug_assert!(!input.has_remaining());
        Ok(self.staging.take_string())
    }

    fn decode_impl(
        &mut self,
        input: &mut ByteCursor<'_>,
        output: &mut CharBuf<'_>,
        last: bool,
    ) -> Result<CoderResult, E::Error> {
        if !self.staging.drain_into(output) {
            return Ok(CoderResult::Overflow);
        }
        self.scan(input, last)?;
        Ok(self.flush(output))
    }

    /// Moves everything consumable from `input` into the staging buffer.
    ///
    /// `input`'s position always equals the start of the current run, so an
    /// early return leaves it in front of whatever was not consumed.
    fn scan(&mut self, input: &mut ByteCursor<'_>, last: bool) -> Result<(), E::Error> {
        let bytes = input.bytes();
        let limit = bytes.len();
        let mut run_start = input.position();
        let mut pos = run_start;

        while pos < limit {
            if bytes[pos] != BACKSLASH {
                pos += 1;
                continue;
            }

            self.decode_run(&bytes[run_start..pos])?;
            input.set_position(pos);

            match self.scan_escape(&bytes[pos..], last) {
                Token::Consumed(len) => {
                    pos += len;
                    run_start = pos;
                    input.set_position(pos);
                }
                Token::Incomplete => {
                    trace!(position = pos, "escape cut by end of input, rewinding");
                    return Ok(());
                }
            }
        }

        let held = if last {
            0
        } else {
            self.encoding.incomplete_tail(&bytes[run_start..limit])
        };
        let end = limit - held;
        self.decode_run(&bytes[run_start..end])?;
        input.set_position(end);
        if held > 0 {
            trace!(
                position = end,
                held,
                encoding = self.encoding.name(),
                "multi-byte sequence cut by end of input, rewinding"
            );
        }
        Ok(())
    }

    fn decode_run(&mut self, run: &[u8]) -> Result<(), E::Error> {
        if run.is_empty() {
            return Ok(());
        }
        self.scratch.clear();
        self.encoding.decode_run(run, &mut self.scratch)?;
        self.staging.push_str(&self.scratch);
        Ok(())
    }

    /// `token` starts at a backslash and runs to the end of the input.
    fn scan_escape(&mut self, token: &[u8], last: bool) -> Token {
        debug_assert_eq!(token.first(), Some(&BACKSLASH));
        let Some(&next) = token.get(1) else {
            return self.truncated(token, last);
        };
        if next == b'u' {
            return self.scan_unicode(token, last);
        }

        self.staging.push_latin1(&token[..2]);
        Token::Consumed(2)
    }

    fn scan_unicode(&mut self, token: &[u8], last: bool) -> Token {
        let Some(digits) = unicode_digits(token) else {
            return self.truncated(token, last);
        };

        match UnicodeEscape::resolve(digits) {
            UnicodeEscape::Char(ch) => self.staging.push_char(ch),
            UnicodeEscape::Whitespace(ch) if self.options.decode_whitespace_escapes => {
                self.staging.push_char(ch);
            }
            UnicodeEscape::HighSurrogate(high) => {
                return self.scan_surrogate_pair(token, high, last);
            }
            UnicodeEscape::Whitespace(_)
            | UnicodeEscape::LowSurrogate(_)
            | UnicodeEscape::Invalid => self.pass_through(&token[..UNICODE_TOKEN_LEN]),
        }
        Token::Consumed(UNICODE_TOKEN_LEN)
    }

    /// A high surrogate is only resolved together with the escape after it.
    fn scan_surrogate_pair(&mut self, token: &[u8], high: u16, last: bool) -> Token {
        let rest = &token[UNICODE_TOKEN_LEN..];
        if !last && is_partial_unicode_token(rest) {
            return Token::Incomplete;
        }

        let paired = match rest.get(..2) {
            Some(br"\u") => unicode_digits(rest).map(UnicodeEscape::resolve),
            _ => None,
        };
        if let Some(UnicodeEscape::LowSurrogate(low)) = paired {
            if let Some(ch) = combine_surrogates(high, low) {
                self.staging.push_char(ch);
                return Token::Consumed(2 * UNICODE_TOKEN_LEN);
            }
        }

        self.pass_through(&token[..UNICODE_TOKEN_LEN]);
        Token::Consumed(UNICODE_TOKEN_LEN)
    }

    /// Handles an escape cut short by the end of the input.
    fn truncated(&mut self, token: &[u8], last: bool) -> Token {
        if !last {
            return Token::Incomplete;
        }
        // Only the introducer is taken; what follows decodes as ordinary text.
        let prefix = if token.get(1) == Some(&b'u') { 2 } else { 1 };
        trace!(
            token = %bstr::BStr::new(token),
            "truncated escape at end of stream, copying literally"
        );
        self.staging.push_latin1(&token[..prefix]);
        Token::Consumed(prefix)
    }

    fn pass_through(&mut self, token: &[u8]) {
        trace!(
            token = %bstr::BStr::new(token),
            "unresolved escape, copying literally"
        );
        self.staging.push_latin1(token);
    }
}

/// The four digit bytes of a `\uXXXX` token starting at `token[0]`.
fn unicode_digits(token: &[u8]) -> Option<[u8; 4]> {
    token.get(2..UNICODE_TOKEN_LEN)?.try_into().ok()
}

/// `bytes` is too short to tell whether a `\uXXXX` token starts here.
fn is_partial_unicode_token(bytes: &[u8]) -> bool {
    bytes.len() < UNICODE_TOKEN_LEN && br"\u".starts_with(&bytes[..bytes.len().min(2)])
}
