// crates/cer-core/src/bits/varint.rs
//
// LEB128 varints for the byte-level container framing. Decoding is strict:
// at most ten bytes, nothing past bit 63 and no redundant trailing zero
// group, so every value has exactly one encoding.

use crate::bits::bit_length;
use crate::error::{CerError, Result};

/// Longest encoding of a u64.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `put_u64` writes for `v`.
pub fn encoded_len(v: u64) -> usize {
    (bit_length(v).max(1) as usize).div_ceil(7)
}

pub fn put_u64(v: u64, out: &mut Vec<u8>) {
    let n = encoded_len(v);
    out.extend((0..n).map(|k| {
        let group = (v >> (7 * k)) as u8 & 0x7F;
        if k + 1 < n {
            group | 0x80
        } else {
            group
        }
    }));
}

/// Read one varint at `*i`, advancing `*i` past it on success.
pub fn get_u64(bytes: &[u8], i: &mut usize) -> Result<u64> {
    let start = *i;
    let tail = bytes.get(start..).unwrap_or(&[]);
    let mut acc = 0u64;

    for (k, &b) in tail.iter().take(MAX_VARINT_LEN).enumerate() {
        let group = (b & 0x7F) as u64;
        if k == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(CerError::parse("varint: overflow"));
        }
        acc |= group << (7 * k);

        if b & 0x80 == 0 {
            if k > 0 && group == 0 {
                return Err(CerError::parse("varint: non-canonical encoding"));
            }
            *i = start + k + 1;
            return Ok(acc);
        }
    }

    if tail.len() >= MAX_VARINT_LEN {
        Err(CerError::parse("varint: too long"))
    } else {
        Err(CerError::parse("varint: eof"))
    }
}
