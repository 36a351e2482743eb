#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use native2ascii::{
    ByteCursor, CharBuf, DecoderOptions, Latin1, Native2AsciiDecoder, Utf8Lossy, produce_chunks,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Fragments the mutator splices in so that escape handling is hit often.
static TOKEN_TABLE: &[&[u8]] = &[
    b"\\",
    b"\\u",
    b"\\u00",
    b"\\u0041",
    b"\\u00e9",
    b"\\u0020",
    b"\\u3000",
    b"\\uD83D",
    b"\\uDE00",
    b"\\uD83D\\uDE00",
    b"\\uzz9G",
    b"\\:",
    b"\\\\",
    "\\é".as_bytes(),
    "日本".as_bytes(),
    b"\xC3",
    b"\xFF",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if !seed.is_multiple_of(4) {
        return fuzzer_mutate(data, size, max_size);
    }

    let mut len = size.min(max_size);
    with_rng(|rng| {
        let splices = rng.random_range(1..=4);
        for _ in 0..splices {
            let token = TOKEN_TABLE[rng.random_range(0..TOKEN_TABLE.len())];
            if len + token.len() > max_size {
                break;
            }
            let at = rng.random_range(0..=len);
            data.copy_within(at..len, at + token.len());
            data[at..at + token.len()].copy_from_slice(token);
            len += token.len();
        }
    });
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, Arbitrary)]
struct Plan {
    parts: u8,
    cap: u8,
    latin1: bool,
    decode_whitespace_escapes: bool,
}

fn streamed<E: native2ascii::BaseEncoding>(
    decoder: &mut Native2AsciiDecoder<E>,
    payload: &[u8],
    parts: usize,
    cap: usize,
) -> Result<String, E::Error> {
    let mut storage = vec!['\0'; cap];
    let mut carry = Vec::new();
    let mut text = String::new();
    let chunks = produce_chunks(payload, parts);
    let count = chunks.len();

    for (i, chunk) in chunks.into_iter().enumerate() {
        carry.extend_from_slice(chunk);
        let mut input = ByteCursor::new(&carry);
        loop {
            let mut out = CharBuf::new(&mut storage);
            let result = if i + 1 == count {
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
    }
    assert!(carry.is_empty(), "bytes left after decode_last: {carry:?}");
    Ok(text)
}

fn check<E: native2ascii::BaseEncoding + Copy>(encoding: E, plan: &Plan, payload: &[u8])
where
    E::Error: std::fmt::Debug,
{
    let options = DecoderOptions {
        decode_whitespace_escapes: plan.decode_whitespace_escapes,
    };
    let parts = usize::from(plan.parts) + 1;
    let cap = usize::from(plan.cap) + 1;

    let expected = Native2AsciiDecoder::with_options(encoding, options)
        .decode_to_string(payload)
        .unwrap();
    let got = streamed(
        &mut Native2AsciiDecoder::with_options(encoding, options),
        payload,
        parts,
        cap,
    )
    .unwrap();
    assert_eq!(got, expected, "parts={parts} cap={cap}");
}

fuzz_target!(|data: &[u8]| {
    let mut u = arbitrary::Unstructured::new(data);
    let Ok(plan) = Plan::arbitrary(&mut u) else {
        return;
    };
    let payload = u.take_rest();
    if payload.is_empty() {
        return;
    }
    if plan.latin1 {
        check(Latin1, &plan, payload);
    } else {
        check(Utf8Lossy, &plan, payload);
    }
});
