// crates/cer-core/src/codes/mod.rs
//
// Universal integer codes.
//
// Every code maps a non-negative integer to a self-delimiting bit string and
// declares the domain it accepts. Decoders distinguish a clean end of stream
// (no bit consumed: `Ok(None)`) from a codeword cut short (`Err(Parse)`).
//
// Codes that reject zero are adapted for unsigned data by shifting by one
// (`encode_unsigned` / `decode_unsigned`); signed data is zig-zag folded first.

pub mod elias;
pub mod enbonacci;
pub mod hybrid;
pub mod iota;
pub mod unary;

use crate::bits::{BitReader, BitWriter};
use crate::error::{CerError, Result};
use crate::transform::zigzag::{op_to_nop, nop_to_op};

pub use elias::{EliasDelta, EliasGamma};
pub use enbonacci::Enbonacci;
pub use hybrid::{elias_delta_fib, elias_gamma_fib};
pub use iota::{elias_delta_iota, elias_gamma_iota};
pub use unary::Unary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// {0, 1, 2, ...}
    Unsigned,
    /// {1, 2, ...}
    UnsignedNonzero,
    /// All integers, folded onto `Unsigned` by zig-zag.
    Signed,
}

impl Domain {
    pub fn contains_zero(self) -> bool {
        !matches!(self, Domain::UnsignedNonzero)
    }
}

pub trait UniversalCode {
    fn name(&self) -> &'static str;

    fn domain(&self) -> Domain;

    fn zero_safe(&self) -> bool {
        self.domain().contains_zero()
    }

    /// Append the codeword for `value`. Values outside the domain are a `Domain` error.
    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()>;

    /// Read one codeword. `Ok(None)` means the stream ended before any bit of a new word.
    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>>;
}

impl<C: UniversalCode + ?Sized> UniversalCode for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn domain(&self) -> Domain {
        (**self).domain()
    }

    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        (**self).encode(value, out)
    }

    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        (**self).decode(input)
    }
}

pub(crate) fn require_nonzero(codec: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(CerError::Domain {
            value: 0,
            domain: Domain::UnsignedNonzero,
            codec,
        });
    }
    Ok(())
}

/// Encode an unsigned value, shifting by one for codes that reject zero.
pub fn encode_unsigned<C: UniversalCode + ?Sized>(code: &C, value: u64, out: &mut BitWriter) -> Result<()> {
    if code.zero_safe() {
        code.encode(value, out)
    } else {
        let shifted = value.checked_add(1).ok_or(CerError::Domain {
            value: value as i128,
            domain: Domain::Unsigned,
            codec: code.name(),
        })?;
        code.encode(shifted, out)
    }
}

pub fn decode_unsigned<C: UniversalCode + ?Sized>(code: &C, input: &mut BitReader<'_>) -> Result<Option<u64>> {
    match code.decode(input)? {
        None => Ok(None),
        Some(v) if code.zero_safe() => Ok(Some(v)),
        Some(0) => Err(CerError::parse(format!("{}: decoded zero from a nonzero code", code.name()))),
        Some(v) => Ok(Some(v - 1)),
    }
}

pub fn encode_signed<C: UniversalCode + ?Sized>(code: &C, value: i64, out: &mut BitWriter) -> Result<()> {
    encode_unsigned(code, nop_to_op(value), out)
}

pub fn decode_signed<C: UniversalCode + ?Sized>(code: &C, input: &mut BitReader<'_>) -> Result<Option<i64>> {
    Ok(decode_unsigned(code, input)?.map(op_to_nop))
}

/// Decode one value that must be present.
pub fn read_required<C: UniversalCode + ?Sized>(code: &C, input: &mut BitReader<'_>) -> Result<u64> {
    code.decode(input)?
        .ok_or_else(|| CerError::Exhausted(format!("{}: expected a codeword", code.name())))
}

/// Concatenate codewords for every value. Nothing is returned on failure.
pub fn encode_seq<C: UniversalCode + ?Sized>(code: &C, values: &[u64]) -> Result<Vec<u8>> {
    let mut out = BitWriter::new();
    for &v in values {
        code.encode(v, &mut out)?;
    }
    Ok(out.into_bits())
}

/// Decode codewords until the stream ends on a word boundary.
pub fn decode_seq<C: UniversalCode + ?Sized>(code: &C, bits: &[u8]) -> Result<Vec<u64>> {
    let mut input = BitReader::new(bits);
    let mut out = Vec::new();
    while let Some(v) = code.decode(&mut input)? {
        out.push(v);
    }
    Ok(out)
}

pub fn encode_unsigned_seq<C: UniversalCode + ?Sized>(code: &C, values: &[u64]) -> Result<Vec<u8>> {
    let mut out = BitWriter::new();
    for &v in values {
        encode_unsigned(code, v, &mut out)?;
    }
    Ok(out.into_bits())
}

pub fn decode_unsigned_seq<C: UniversalCode + ?Sized>(code: &C, bits: &[u8]) -> Result<Vec<u64>> {
    let mut input = BitReader::new(bits);
    let mut out = Vec::new();
    while let Some(v) = decode_unsigned(code, &mut input)? {
        out.push(v);
    }
    Ok(out)
}

/// Stable numbering of the universal codes, used in block headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    Unary,
    EliasGamma,
    EliasDelta,
    /// Enbonacci of order 2..=8 (2 is Fibonacci).
    Enbonacci(u8),
    EliasGammaFib,
    EliasDeltaFib,
    EliasGammaIota,
    EliasDeltaIota,
}

impl CodecId {
    pub const FIBONACCI: CodecId = CodecId::Enbonacci(2);

    pub fn to_u8(self) -> u8 {
        match self {
            CodecId::Unary => 0,
            CodecId::EliasGamma => 1,
            CodecId::EliasDelta => 2,
            CodecId::Enbonacci(k) => k + 1,
            CodecId::EliasGammaFib => 10,
            CodecId::EliasDeltaFib => 11,
            CodecId::EliasGammaIota => 12,
            CodecId::EliasDeltaIota => 13,
        }
    }

    pub fn from_u8(id: u8) -> Result<Self> {
        Ok(match id {
            0 => CodecId::Unary,
            1 => CodecId::EliasGamma,
            2 => CodecId::EliasDelta,
            3..=9 => CodecId::Enbonacci(id - 1),
            10 => CodecId::EliasGammaFib,
            11 => CodecId::EliasDeltaFib,
            12 => CodecId::EliasGammaIota,
            13 => CodecId::EliasDeltaIota,
            _ => return Err(CerError::parse(format!("unknown codec id {id}"))),
        })
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, CodecId::EliasGammaIota | CodecId::EliasDeltaIota)
    }

    /// Instantiate the code. `max_input` is the largest value the code will
    /// see; only the bounded (Iota) codes use it.
    pub fn build(self, max_input: u64) -> Result<Box<dyn UniversalCode>> {
        Ok(match self {
            CodecId::Unary => Box::new(Unary),
            CodecId::EliasGamma => Box::new(EliasGamma::new()),
            CodecId::EliasDelta => Box::new(EliasDelta::new()),
            CodecId::Enbonacci(k) => Box::new(Enbonacci::new(k as usize)?),
            CodecId::EliasGammaFib => Box::new(elias_gamma_fib()),
            CodecId::EliasDeltaFib => Box::new(elias_delta_fib()),
            CodecId::EliasGammaIota => Box::new(elias_gamma_iota(max_input)?),
            CodecId::EliasDeltaIota => Box::new(elias_delta_iota(max_input)?),
        })
    }
}
