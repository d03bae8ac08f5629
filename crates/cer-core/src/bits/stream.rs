// crates/cer-core/src/bits/stream.rs
//
// Bit-level streams. A bit is stored as a u8 holding 0 or 1 so that codewords
// can be compared directly against literal bit lists.

use crate::error::{CerError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitWriter {
    bits: Vec<u8>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit as u8);
    }

    /// Push `count` copies of `bit`.
    pub fn push_run(&mut self, bit: bool, count: usize) {
        self.bits.extend(std::iter::repeat(bit as u8).take(count));
    }

    /// Push the low `width` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u64, width: u32) {
        debug_assert!(width <= 64);
        for b in (0..width).rev() {
            self.bits.push(((value >> b) & 1) as u8);
        }
    }

    pub fn extend_from_bits(&mut self, bits: &[u8]) {
        self.bits.extend(bits.iter().map(|&b| (b != 0) as u8));
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }
}

#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bits: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a [u8]) -> Self {
        Self { bits, pos: 0 }
    }

    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let b = *self.bits.get(self.pos)?;
        self.pos += 1;
        Some(b != 0)
    }

    /// Read `width` bits as an MSB-first integer. Running short is a parse error.
    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        if width > 64 {
            return Err(CerError::parse(format!("bit field too wide: {width}")));
        }
        if self.remaining_len() < width as usize {
            return Err(CerError::parse(format!(
                "need {} bits, {} left",
                width,
                self.remaining_len()
            )));
        }
        let mut v = 0u64;
        for _ in 0..width {
            v = (v << 1) | (self.bits[self.pos] != 0) as u64;
            self.pos += 1;
        }
        Ok(v)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bits.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_len(&self) -> usize {
        self.bits.len().saturating_sub(self.pos)
    }

    /// The bits not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bits[self.pos.min(self.bits.len())..]
    }
}
