/// Configuration options for [`Native2AsciiDecoder`](crate::Native2AsciiDecoder).
///
/// The base encoding is chosen when the decoder is constructed; these options
/// only adjust how escape tokens are resolved.
///
/// # Examples
///
/// ```rust
/// use native2ascii::{DecoderOptions, Latin1, Native2AsciiDecoder};
///
/// let mut decoder = Native2AsciiDecoder::with_options(
///     Latin1,
///     DecoderOptions {
///         decode_whitespace_escapes: true,
///     },
/// );
/// assert_eq!(decoder.decode_to_string(br"a\u0020b").unwrap(), "a b");
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Whether `\uXXXX` escapes that spell a whitespace character are decoded.
    ///
    /// By default such escapes (for example `\u0020` or `\u0009`) are left in
    /// the output as their literal six characters. The affected set is
    /// documented on [`is_guarded_whitespace`](crate::is_guarded_whitespace).
    ///
    /// # Default
    ///
    /// `false`
    pub decode_whitespace_escapes: bool,
}
