//! Caller-owned input and output windows for a single decode call.
//!
//! Neither type is retained by the decoder past the call that receives it:
//! the decoder only moves the positions. Whatever input is left between
//! [`ByteCursor::position`] and the end of the slice was not consumable yet and
//! must be handed back, followed by more bytes, on the next call.

/// A read position over a borrowed byte slice. The limit is the slice end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor positioned at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Index of the next unconsumed byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of bytes visible to the cursor.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.bytes.len()
    }

    /// Number of unconsumed bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Returns `true` while unconsumed bytes remain.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.position < self.bytes.len()
    }

    /// The unconsumed bytes, which a caller must resupply on the next call.
    #[must_use]
    pub fn unconsumed(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        debug_assert!(position <= self.bytes.len(), "cursor past its limit");
        self.position = position;
    }
}

/// A write position over a caller-provided `char` destination.
#[derive(Debug)]
pub struct CharBuf<'a> {
    chars: &'a mut [char],
    position: usize,
}

impl<'a> CharBuf<'a> {
    /// Wraps `chars` as an empty destination with `chars.len()` capacity.
    #[must_use]
    pub fn new(chars: &'a mut [char]) -> Self {
        Self { chars, position: 0 }
    }

    /// Number of characters written so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Free capacity left in the destination.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.position
    }

    /// Returns `true` once no more characters fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.position == self.chars.len()
    }

    /// The characters written so far, in order.
    #[must_use]
    pub fn written(&self) -> &[char] {
        &self.chars[..self.position]
    }

    /// Rewinds the write position so the destination can be reused after the
    /// caller has taken what was written.
    pub fn clear(&mut self) {
        self.position = 0;
    }

    /// Writes every character of `iter`. The iterator must not yield more than
    /// [`remaining`](Self::remaining) characters.
    pub(crate) fn put_all<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = char>,
    {
        for ch in iter {
            self.chars[self.position] = ch;
            self.position += 1;
        }
    }
}
