// crates/cer-core/src/codes/iota.rs
//
// Length-bounded gamma/delta: when the largest input is known, the unary
// length prefix is replaced by a fixed-width binary field. The field must hold
// every prefix value up to the bound, so its width is bits(⌊log₂ max⌋), never
// less than one bit.

use crate::bits::{bit_length, floor_log2, BitReader, BitWriter};
use crate::codes::elias::{DeltaWith, GammaWith, LengthPrefix};
use crate::codes::Domain;
use crate::error::{CerError, Result};

#[derive(Clone, Copy, Debug)]
pub struct IotaPrefix {
    width: u32,
    max_len: u32,
}

impl IotaPrefix {
    fn for_max_len(max_len: u32) -> Self {
        Self {
            width: bit_length(max_len as u64).max(1),
            max_len,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl LengthPrefix for IotaPrefix {
    fn write_len(&self, p: u32, out: &mut BitWriter) -> Result<()> {
        if p > self.max_len {
            return Err(CerError::Domain {
                value: p as i128,
                domain: Domain::Unsigned,
                codec: "iota prefix",
            });
        }
        out.push_bits(p as u64, self.width);
        Ok(())
    }

    fn read_len(&self, input: &mut BitReader<'_>) -> Result<Option<u32>> {
        if input.is_at_end() {
            return Ok(None);
        }
        let p = input.read_bits(self.width)?;
        if p > self.max_len as u64 {
            return Err(CerError::parse(format!(
                "iota prefix {p} exceeds maximum {}",
                self.max_len
            )));
        }
        Ok(Some(p as u32))
    }
}

fn check_max(max_input: u64) -> Result<()> {
    if max_input == 0 {
        return Err(CerError::validation("iota codes need max_input >= 1"));
    }
    Ok(())
}

/// Width of the fixed prefix used by `elias_gamma_iota(max_input)`.
pub fn gamma_iota_prefix_width(max_input: u64) -> u32 {
    IotaPrefix::for_max_len(floor_log2(max_input.max(1))).width()
}

pub fn elias_gamma_iota(max_input: u64) -> Result<GammaWith<IotaPrefix>> {
    check_max(max_input)?;
    let prefix = IotaPrefix::for_max_len(floor_log2(max_input));
    Ok(GammaWith::with_prefix(prefix, "elias_gamma_iota", Some(max_input)))
}

pub fn elias_delta_iota(max_input: u64) -> Result<DeltaWith<IotaPrefix>> {
    check_max(max_input)?;
    let max_bits = bit_length(max_input) as u64;
    let prefix = IotaPrefix::for_max_len(floor_log2(max_bits));
    let length = GammaWith::with_prefix(prefix, "elias_delta_iota", Some(max_bits));
    Ok(DeltaWith::with_length_code(length, "elias_delta_iota", Some(max_input)))
}
