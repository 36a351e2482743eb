#![allow(missing_docs, dead_code)]

use native2ascii::{BaseEncoding, ByteCursor, CharBuf, Native2AsciiDecoder};

/// A small `.properties` file, cut so that escapes straddle chunk borders.
pub const STREAM: [&str; 7] = [
    "# greeting\n",
    "greeting=Gr\\u00",
    "fc\\u00df",
    " dich\\\n",
    "emoji=\\uD83D",
    "\\uDE00 and \\u0020 kept\n",
    "path=C:\\\\temp\\",
];

pub const PROPERTIES: &str = "\
# Messages
title=Gr\\u00fc\\u00dfe aus K\\u00f6ln
tokyo=\\u6771\\u4eac
smile=\\uD83D\\uDE00
padded=\\u0020value\\u0020
colon\\:key=a\\=b
broken=\\u00zz and \\uD83D alone
";

/// What a single chunk produced.
#[derive(Debug)]
pub struct Step {
    pub text: String,
    pub carry: Vec<u8>,
}

/// Feeds `chunks` through `decoder` the way a streaming reader would, with a
/// destination of `cap` characters, and finishes with `decode_last`.
pub fn feed<E: BaseEncoding>(
    decoder: &mut Native2AsciiDecoder<E>,
    chunks: &[&[u8]],
    cap: usize,
) -> Result<Vec<Step>, E::Error> {
    let mut storage = vec!['\0'; cap];
    let mut carry = Vec::new();
    let mut steps = Vec::new();

    for (i, chunk) in chunks.iter().enumerate() {
        let last = i + 1 == chunks.len();
        carry.extend_from_slice(chunk);
        let mut input = ByteCursor::new(&carry);
        let mut text = String::new();
        loop {
            let mut out = CharBuf::new(&mut storage);
            let result = if last {
                decoder.decode_last(&mut input, &mut out)?
            } else {
                decoder.decode(&mut input, &mut out)?
            };
            text.extend(out.written());
            if result.is_underflow() {
                break;
            }
        }
        let consumed = input.position();
        carry.drain(..consumed);
        steps.push(Step {
            text,
            carry: carry.clone(),
        });
    }
    Ok(steps)
}
