//! Word-parallel (SWAR) byte search.
//!
//! Each step loads one little-endian `u64`, XORs it with the target byte
//! broadcast to every lane so matching lanes become zero, then isolates the
//! zero lanes with a carry-free high-bit test. The lowest set bit gives the
//! first match.

use crate::utils::constants::WORD_SIZE;

const LOW_SEVEN_BITS: u64 = 0x7F7F_7F7F_7F7F_7F7F;

/// Target byte copied into every lane of a word.
#[inline]
pub const fn broadcast(byte: u8) -> u64 {
    (byte as u64) * 0x0101_0101_0101_0101
}

/// High bit of each lane is set iff that lane of `word` equals the byte
/// broadcast in `pattern`.
///
/// Exact for every lane: the addition never carries across lanes because the
/// high bit is masked off first.
#[inline]
pub const fn match_lanes(word: u64, pattern: u64) -> u64 {
    let input = word ^ pattern;
    let tmp = (input & LOW_SEVEN_BITS) + LOW_SEVEN_BITS;
    !(tmp | input | LOW_SEVEN_BITS)
}

#[inline]
fn load_word(chunk: &[u8]) -> u64 {
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(chunk);
    u64::from_le_bytes(word)
}

/// Offset of the first byte at or after `from` equal to the byte broadcast in
/// `pattern`, or `None`.
///
/// `buf.len()` must be a multiple of [`WORD_SIZE`]; see [`ScratchBuffer`].
/// Loads always start on a word boundary: the word containing `from` is read
/// whole and lanes before `from` are masked out.
#[inline]
pub fn find_byte(buf: &[u8], from: usize, pattern: u64) -> Option<usize> {
    debug_assert_eq!(buf.len() % WORD_SIZE, 0);
    if from >= buf.len() {
        return None;
    }

    let mut offset = from - from % WORD_SIZE;
    let skip = (from - offset) * 8;
    let mut mask = u64::MAX << skip;

    for chunk in buf[offset..].chunks_exact(WORD_SIZE) {
        let hits = match_lanes(load_word(chunk), pattern) & mask;
        if hits != 0 {
            return Some(offset + (hits.trailing_zeros() / 8) as usize);
        }
        offset += WORD_SIZE;
        mask = u64::MAX;
    }

    None
}

/// Worker-private copy of one scan window.
///
/// The backing storage is always a whole number of words, and every byte
/// between the loaded data and the next word boundary is zero, so
/// [`find_byte`] can run over [`ScratchBuffer::padded`] without reading stale
/// bytes. Neither search target is zero, so the padding never matches.
pub struct ScratchBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl ScratchBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; padded_len(capacity.max(1))],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Replaces the contents with `src`. Panics if `src` exceeds the capacity.
    pub fn load(&mut self, src: &[u8]) {
        assert!(src.len() <= self.bytes.len(), "window larger than scratch buffer");
        self.bytes[..src.len()].copy_from_slice(src);
        self.len = src.len();
        let padded = padded_len(self.len);
        self.bytes[self.len..padded].fill(0);
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn padded(&self) -> &[u8] {
        &self.bytes[..padded_len(self.len)]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[inline]
pub const fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}
