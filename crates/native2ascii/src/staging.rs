#![expect(clippy::inline_always)]

use alloc::{collections::VecDeque, string::String};

use crate::cursor::CharBuf;

/// Decoded characters that did not fit into the caller's destination yet.
///
/// Characters are appended at the tail in decode order and only ever leave
/// from the head, so nothing is reordered, duplicated or delivered twice.
#[derive(Debug, Default)]
pub(crate) struct StagingBuffer {
    data: VecDeque<char>,
}

impl StagingBuffer {
    pub(crate) fn new() -> Self {
        Self {
            data: VecDeque::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        self.data.push_back(ch);
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        // Reserve the byte length as an upper bound on additional chars
        self.data.reserve(text.len());
        self.data.extend(text.chars());
    }

    /// Appends raw bytes one `char` per byte (ISO-8859-1 widening).
    pub(crate) fn push_latin1(&mut self, bytes: &[u8]) {
        self.data.extend(bytes.iter().copied().map(char::from));
    }

    /// Moves as many leading characters as fit into `out`. Returns `true` if
    /// the buffer is empty afterwards.
    pub(crate) fn drain_into(&mut self, out: &mut CharBuf<'_>) -> bool {
        let n = core::cmp::min(out.remaining(), self.data.len());
        if n > 0 {
            out.put_all(self.data.drain(..n));
        }
        self.data.is_empty()
    }

    /// Empties the buffer into a `String`.
    pub(crate) fn take_string(&mut self) -> String {
        self.data.drain(..).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }
}
