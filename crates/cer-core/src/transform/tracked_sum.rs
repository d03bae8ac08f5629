// crates/cer-core/src/transform/tracked_sum.rs
//
// Fixed-width coding of a sequence whose total is known to both sides. Each
// item is at most the sum still unaccounted for, so it takes exactly
// ⌈log₂(remaining + 1)⌉ bits; once the total is spent, items cost nothing.

use crate::bits::{ceil_log2, BitReader, BitWriter};
use crate::codes::Domain;
use crate::error::{CerError, Result};

pub fn tracked_sum_width(remaining: u64) -> u32 {
    ceil_log2(remaining.saturating_add(1))
}

pub fn tracked_sum_encode(values: &[u64], total: u64) -> Result<Vec<u8>> {
    let mut out = BitWriter::new();
    let mut remaining = total;
    for &v in values {
        if v > remaining {
            return Err(CerError::Domain {
                value: v as i128,
                domain: Domain::Unsigned,
                codec: "tracked_sum",
            });
        }
        out.push_bits(v, tracked_sum_width(remaining));
        remaining -= v;
    }
    Ok(out.into_bits())
}

pub fn tracked_sum_decode(bits: &[u8], total: u64, count: usize) -> Result<Vec<u64>> {
    let mut input = BitReader::new(bits);
    let mut remaining = total;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let v = input.read_bits(tracked_sum_width(remaining))?;
        if v > remaining {
            return Err(CerError::parse(format!("tracked sum: item {v} exceeds remaining {remaining}")));
        }
        remaining -= v;
        out.push(v);
    }
    if !input.is_at_end() {
        return Err(CerError::parse("tracked sum: trailing bits"));
    }
    Ok(out)
}
