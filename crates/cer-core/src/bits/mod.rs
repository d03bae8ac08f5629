// crates/cer-core/src/bits/mod.rs

pub mod pack;
pub mod stream;
pub mod varint;

pub use pack::{pack_bits, unpack_bits};
pub use stream::{BitReader, BitWriter};

/// Number of bits in the binary representation of `n` (0 for 0).
#[inline]
pub fn bit_length(n: u64) -> u32 {
    64 - n.leading_zeros()
}

/// ⌊log₂ n⌋ for n ≥ 1.
#[inline]
pub fn floor_log2(n: u64) -> u32 {
    debug_assert!(n >= 1);
    63 - n.leading_zeros()
}

/// ⌈log₂ n⌉, with 0 for n ≤ 1. This is the raw width needed for values in `[0, n)`.
#[inline]
pub fn ceil_log2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        bit_length(n - 1)
    }
}
