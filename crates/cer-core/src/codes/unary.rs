// crates/cer-core/src/codes/unary.rs

use crate::bits::{BitReader, BitWriter};
use crate::codes::{Domain, UniversalCode};
use crate::error::{CerError, Result};

/// n → n zeros followed by a one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unary;

impl UniversalCode for Unary {
    fn name(&self) -> &'static str {
        "unary"
    }

    fn domain(&self) -> Domain {
        Domain::Unsigned
    }

    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        out.push_run(false, value as usize);
        out.push(true);
        Ok(())
    }

    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        read_unary(input, "unary")
    }
}

/// Count zeros up to the terminating one.
pub(crate) fn read_unary(input: &mut BitReader<'_>, codec: &str) -> Result<Option<u64>> {
    let mut zeros = 0u64;
    loop {
        match input.read_bit() {
            Some(true) => return Ok(Some(zeros)),
            Some(false) => zeros += 1,
            None if zeros == 0 => return Ok(None),
            None => {
                return Err(CerError::parse(format!(
                    "{codec}: stream ended after {zeros} prefix zeros"
                )))
            }
        }
    }
}
