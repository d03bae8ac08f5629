// crates/cer-core/src/bits/pack.rs

use crate::error::{CerError, Result};

/// Pack a bit list (one bit per u8) into bytes, 8 bits per byte.
///
/// Bit order is MSB-first within the packed byte stream:
/// - The first bit becomes the MSB of output[0].
/// - The final byte is zero-padded; callers keep the bit length alongside.
pub fn pack_bits(bits: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; (bits.len() + 7) / 8];

    for (cursor, &bit) in bits.iter().enumerate() {
        match bit {
            0 => {}
            1 => out[cursor / 8] |= 1u8 << (7 - (cursor % 8)),
            other => {
                return Err(CerError::validation(format!(
                    "pack_bits: bit {} has value {}",
                    cursor, other
                )))
            }
        }
    }

    Ok(out)
}

/// Unpack `bit_len` bits from a packed MSB-first byte stream.
///
/// Inverse of `pack_bits` when the same `bit_len` is used. Padding bits
/// past `bit_len` must be zero.
pub fn unpack_bits(packed: &[u8], bit_len: usize) -> Result<Vec<u8>> {
    let need_bytes = (bit_len + 7) / 8;
    if packed.len() != need_bytes {
        return Err(CerError::parse(format!(
            "unpack_bits: need {} bytes for {} bits, got {}",
            need_bytes,
            bit_len,
            packed.len()
        )));
    }

    let mut out = Vec::with_capacity(bit_len);
    for cursor in 0..bit_len {
        out.push((packed[cursor / 8] >> (7 - (cursor % 8))) & 1);
    }

    let tail = bit_len % 8;
    if tail != 0 {
        let pad_mask = 0xFFu8 >> tail;
        if packed[need_bytes - 1] & pad_mask != 0 {
            return Err(CerError::parse("unpack_bits: nonzero padding"));
        }
    }

    Ok(out)
}
