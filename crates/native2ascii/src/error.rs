use thiserror::Error;

/// A byte run that is not valid in the strict base encoding.
///
/// Offsets are relative to the run handed to the delegate, not to the caller's
/// input buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("malformed {encoding} input: {len} invalid byte(s) after {valid_up_to} valid byte(s)")]
pub struct MalformedInput {
    /// Name of the encoding that rejected the run.
    pub encoding: &'static str,
    /// Number of leading bytes of the run that decoded cleanly.
    pub valid_up_to: usize,
    /// Length of the offending sequence.
    pub len: usize,
}

/// Failure of [`read_to_string`](crate::io::read_to_string).
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum ReadError<E> {
    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    /// The base encoding rejected part of the stream.
    #[error("decode error: {0}")]
    Decode(E),
}
