//! An incremental decoder for `native2ascii` style escaped byte streams.
//!
//! Text in this format is plain bytes in some base encoding, with characters
//! the producer could not (or would not) write directly replaced by `\uXXXX`
//! escapes. Java `.properties` files are the best known example.
//!
//! [`Native2AsciiDecoder`] consumes such a stream in arbitrary chunks and
//! produces `char`s into a caller-bounded destination. Chunk boundaries may
//! fall anywhere, including inside an escape token, and the destination may be
//! as small as one character.
//!
//! ```rust
//! use native2ascii::{Latin1, Native2AsciiDecoder};
//!
//! let mut decoder = Native2AsciiDecoder::new(Latin1);
//! let text = decoder.decode_to_string(br"greeting=Gr\u00fc\:\u00DF\u0065")?;
//! assert_eq!(text, r"greeting=Grü\:ße");
//! # Ok::<(), core::convert::Infallible>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod chunk_utils;
mod cursor;
mod decoder;
mod encoding;
mod error;
mod escape;
#[cfg(feature = "std")]
pub mod io;
mod options;
mod staging;

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use cursor::{ByteCursor, CharBuf};
pub use decoder::{CoderResult, Native2AsciiDecoder};
pub use encoding::{BaseEncoding, Latin1, Utf8, Utf8Lossy};
#[cfg(feature = "std")]
pub use error::ReadError;
pub use error::MalformedInput;
pub use escape::{UnicodeEscape, code_unit, combine_surrogates, is_guarded_whitespace};
pub use options::DecoderOptions;
