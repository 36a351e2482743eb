//! Driving a [`Native2AsciiDecoder`] from a [`std::io::Read`].

use alloc::{string::String, vec, vec::Vec};
use std::io::{ErrorKind, Read};

use crate::{ByteCursor, CharBuf, Native2AsciiDecoder, encoding::BaseEncoding, error::ReadError};

const READ_CHUNK: usize = 8 * 1024;
const CHAR_CHUNK: usize = 1024;

/// Reads `reader` to the end and decodes it.
///
/// Bytes are read in fixed-size chunks; whatever the decoder leaves
/// unconsumed at the end of a chunk is carried over in front of the next one.
///
/// ```rust
/// use native2ascii::{Utf8, io::read_to_string};
///
/// let text = read_to_string(&br"name=J\u00fcrgen"[..], Utf8)?;
/// assert_eq!(text, "name=Jürgen");
/// # Ok::<(), native2ascii::ReadError<native2ascii::MalformedInput>>(())
/// ```
///
/// # Errors
///
/// [`ReadError::Io`] if the reader fails (other than with
/// [`ErrorKind::Interrupted`], which is retried), [`ReadError::Decode`] if the
/// base encoding rejects the input.
pub fn read_to_string<R, E>(reader: R, encoding: E) -> Result<String, ReadError<E::Error>>
where
    R: Read,
    E: BaseEncoding,
{
    let mut decoder = Native2AsciiDecoder::new(encoding);
    read_with(reader, &mut decoder)
}

/// Like [`read_to_string`], with a caller-configured decoder.
///
/// The decoder is reset before reading.
///
/// # Errors
///
/// Same as [`read_to_string`].
pub fn read_with<R, E>(
    mut reader: R,
    decoder: &mut Native2AsciiDecoder<E>,
) -> Result<String, ReadError<E::Error>>
where
    R: Read,
    E: BaseEncoding,
{
    decoder.reset();

    let mut pending: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut chars = vec!['\0'; CHAR_CHUNK];
    let mut text = String::new();

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        pending.extend_from_slice(&chunk[..n]);
        let last = n == 0;

        let mut input = ByteCursor::new(&pending);
        loop {
            let mut output = CharBuf::new(&mut chars);
            let result = if last {
                decoder.decode_last(&mut input, &mut output)
            } else {
                decoder.decode(&mut input, &mut output)
            }
            .map_err(ReadError::Decode)?;
            text.extend(output.written());
            if result.is_underflow() {
                break;
            }
        }
        let consumed = input.position();
        pending.drain(..consumed);

        if last {
            break;
        }
    }

    loop {
        let mut output = CharBuf::new(&mut chars);
        let result = decoder.flush(&mut output);
        text.extend(output.written());
        if result.is_underflow() {
            return Ok(text);
        }
    }
}
