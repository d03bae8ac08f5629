// crates/cer-core/src/codes/hybrid.rs
//
// Gamma/delta with a Fibonacci-coded length prefix: fib(p + 1) replaces unary(p).
// Long bodies pay logarithmically for their length instead of linearly.

use crate::bits::{BitReader, BitWriter};
use crate::codes::elias::{DeltaWith, GammaWith, LengthPrefix};
use crate::codes::{Enbonacci, UniversalCode};
use crate::error::{CerError, Result};

#[derive(Clone, Debug)]
pub struct FibPrefix {
    fib: Enbonacci,
}

impl LengthPrefix for FibPrefix {
    fn write_len(&self, p: u32, out: &mut BitWriter) -> Result<()> {
        self.fib.encode(p as u64 + 1, out)
    }

    fn read_len(&self, input: &mut BitReader<'_>) -> Result<Option<u32>> {
        match self.fib.decode(input)? {
            None => Ok(None),
            Some(v) if v - 1 > 64 => Err(CerError::parse(format!("fib length prefix too large: {v}"))),
            Some(v) => Ok(Some((v - 1) as u32)),
        }
    }
}

fn fib_prefix() -> FibPrefix {
    FibPrefix {
        fib: Enbonacci::fibonacci(),
    }
}

pub fn elias_gamma_fib() -> GammaWith<FibPrefix> {
    GammaWith::with_prefix(fib_prefix(), "elias_gamma_fib", None)
}

pub fn elias_delta_fib() -> DeltaWith<FibPrefix> {
    let length = GammaWith::with_prefix(fib_prefix(), "elias_delta_fib", None);
    DeltaWith::with_length_code(length, "elias_delta_fib", None)
}
