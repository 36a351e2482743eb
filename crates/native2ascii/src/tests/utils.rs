use alloc::{string::String, vec, vec::Vec};

use crate::{BaseEncoding, ByteCursor, CharBuf, Native2AsciiDecoder};

/// How a chunked decode is finished once every chunk has been fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum End {
    /// Only `flush`; a cut-off tail stays unconsumed.
    Flush,
    /// `decode_last` on the carried tail, then `flush`.
    DecodeLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub text: String,
    pub unconsumed: Vec<u8>,
}

/// Feeds `chunks` in order the way a streaming caller would: unconsumed bytes
/// are carried in front of the next chunk and output is drained through a
/// destination holding `cap` characters.
pub(crate) fn decode_chunks<E: BaseEncoding>(
    decoder: &mut Native2AsciiDecoder<E>,
    chunks: &[&[u8]],
    cap: usize,
    end: End,
) -> Result<Decoded, E::Error> {
    assert!(cap > 0, "a zero-sized destination never makes progress");
    let mut storage = vec!['\0'; cap];
    let mut text = String::new();
    let mut carry: Vec<u8> = Vec::new();

    for chunk in chunks {
        carry.extend_from_slice(chunk);
        let consumed = drive(decoder, &carry, &mut storage, &mut text, false)?;
        carry.drain(..consumed);
    }
    if end == End::DecodeLast {
        let consumed = drive(decoder, &carry, &mut storage, &mut text, true)?;
        carry.drain(..consumed);
    }

    loop {
        let mut out = CharBuf::new(&mut storage);
        let result = decoder.flush(&mut out);
        text.extend(out.written());
        if result.is_underflow() {
            break;
        }
    }

    Ok(Decoded {
        text,
        unconsumed: carry,
    })
}

/// One decode call, repeated while the destination overflows. Returns the
/// number of bytes consumed.
fn drive<E: BaseEncoding>(
    decoder: &mut Native2AsciiDecoder<E>,
    bytes: &[u8],
    storage: &mut [char],
    text: &mut String,
    last: bool,
) -> Result<usize, E::Error> {
    let mut input = ByteCursor::new(bytes);
    loop {
        let mut out = CharBuf::new(storage);
        let result = if last {
            decoder.decode_last(&mut input, &mut out)?
        } else {
            decoder.decode(&mut input, &mut out)?
        };
        text.extend(out.written());
        if result.is_underflow() {
            return Ok(input.position());
        }
    }
}

/// Decodes `bytes` with a single `decode` call followed by `flush`.
pub(crate) fn decode_whole<E: BaseEncoding>(
    encoding: E,
    bytes: &[u8],
    end: End,
) -> Result<Decoded, E::Error> {
    decode_chunks(&mut Native2AsciiDecoder::new(encoding), &[bytes], 4096, end)
}

/// Splits `bytes` at each offset in `splits` (taken modulo the remaining
/// length), the same way the streaming property tests do.
pub(crate) fn split_at_offsets<'a>(bytes: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = bytes;
    for &s in splits {
        if rest.is_empty() {
            break;
        }
        let size = 1 + (s % rest.len());
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
