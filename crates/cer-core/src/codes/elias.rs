// crates/cer-core/src/codes/elias.rs
//
// Elias gamma and delta, parameterized by how the length prefix is written.
//
//   gamma(n) = prefix(p) ++ low p bits of n             p = ⌊log₂ n⌋
//   delta(n) = gamma(L)  ++ low L-1 bits of n           L = bits(n)
//
// The classical codes use a unary prefix. The Iota variants (iota.rs) use a
// fixed-width binary prefix and the Fib variants (hybrid.rs) a Fibonacci one.

use crate::bits::{bit_length, floor_log2, BitReader, BitWriter};
use crate::codes::unary::read_unary;
use crate::codes::{require_nonzero, Domain, UniversalCode};
use crate::error::{CerError, Result};

/// How a gamma code writes the body length `p` that precedes the body bits.
pub trait LengthPrefix {
    fn write_len(&self, p: u32, out: &mut BitWriter) -> Result<()>;

    /// `Ok(None)` only when no bit was consumed.
    fn read_len(&self, input: &mut BitReader<'_>) -> Result<Option<u32>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UnaryPrefix;

impl LengthPrefix for UnaryPrefix {
    fn write_len(&self, p: u32, out: &mut BitWriter) -> Result<()> {
        out.push_run(false, p as usize);
        out.push(true);
        Ok(())
    }

    fn read_len(&self, input: &mut BitReader<'_>) -> Result<Option<u32>> {
        match read_unary(input, "gamma prefix")? {
            None => Ok(None),
            Some(p) if p > 63 => Err(CerError::parse(format!("gamma prefix too long: {p}"))),
            Some(p) => Ok(Some(p as u32)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GammaWith<P> {
    prefix: P,
    name: &'static str,
    max_input: Option<u64>,
}

pub type EliasGamma = GammaWith<UnaryPrefix>;

impl GammaWith<UnaryPrefix> {
    pub fn new() -> Self {
        Self::with_prefix(UnaryPrefix, "elias_gamma", None)
    }
}

impl Default for GammaWith<UnaryPrefix> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LengthPrefix> GammaWith<P> {
    pub(crate) fn with_prefix(prefix: P, name: &'static str, max_input: Option<u64>) -> Self {
        Self {
            prefix,
            name,
            max_input,
        }
    }

    pub(crate) fn write_value(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        let p = floor_log2(value);
        self.prefix.write_len(p, out)?;
        out.push_bits(value, p);
        Ok(())
    }

    pub(crate) fn read_value(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        let Some(p) = self.prefix.read_len(input)? else {
            return Ok(None);
        };
        if p > 63 {
            return Err(CerError::parse(format!("{}: body length {p}", self.name)));
        }
        let low = input.read_bits(p)?;
        Ok(Some((1u64 << p) | low))
    }
}

impl<P: LengthPrefix> UniversalCode for GammaWith<P> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn domain(&self) -> Domain {
        Domain::UnsignedNonzero
    }

    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        require_nonzero(self.name, value)?;
        check_bound(self.name, self.max_input, value)?;
        self.write_value(value, out)
    }

    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        let v = self.read_value(input)?;
        if let (Some(v), Some(max)) = (v, self.max_input) {
            if v > max {
                return Err(CerError::parse(format!("{}: decoded {v} above bound {max}", self.name)));
            }
        }
        Ok(v)
    }
}

#[derive(Clone, Debug)]
pub struct DeltaWith<P> {
    length: GammaWith<P>,
    name: &'static str,
    max_input: Option<u64>,
}

pub type EliasDelta = DeltaWith<UnaryPrefix>;

impl DeltaWith<UnaryPrefix> {
    pub fn new() -> Self {
        Self::with_length_code(EliasGamma::new(), "elias_delta", None)
    }
}

impl Default for DeltaWith<UnaryPrefix> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LengthPrefix> DeltaWith<P> {
    pub(crate) fn with_length_code(length: GammaWith<P>, name: &'static str, max_input: Option<u64>) -> Self {
        Self {
            length,
            name,
            max_input,
        }
    }
}

impl<P: LengthPrefix> UniversalCode for DeltaWith<P> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn domain(&self) -> Domain {
        Domain::UnsignedNonzero
    }

    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        require_nonzero(self.name, value)?;
        check_bound(self.name, self.max_input, value)?;
        let len = bit_length(value);
        self.length.write_value(len as u64, out)?;
        out.push_bits(value, len - 1);
        Ok(())
    }

    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        let Some(len) = self.length.read_value(input)? else {
            return Ok(None);
        };
        if len > 64 {
            return Err(CerError::parse(format!("{}: body length {len}", self.name)));
        }
        let body = input.read_bits(len as u32 - 1)?;
        let v = (1u64 << (len - 1)) | body;
        if let Some(max) = self.max_input {
            if v > max {
                return Err(CerError::parse(format!("{}: decoded {v} above bound {max}", self.name)));
            }
        }
        Ok(Some(v))
    }
}

fn check_bound(codec: &'static str, max_input: Option<u64>, value: u64) -> Result<()> {
    match max_input {
        Some(max) if value > max => Err(CerError::Domain {
            value: value as i128,
            domain: Domain::UnsignedNonzero,
            codec,
        }),
        _ => Ok(()),
    }
}
