// crates/cer-core/src/transform/haven.rs
//
// Haven-bucket coding: each value is split into a universally coded high part
// and a tail of `hb` raw low bits. `hb` adapts to the previous value, so
// values of similar magnitude spend few bits on the universal code.

use crate::bits::{bit_length, BitReader, BitWriter};
use crate::codes::{decode_unsigned, encode_unsigned, UniversalCode};
use crate::error::{CerError, Result};

pub type BucketSizeFn = fn(u64) -> u32;

/// Bucket as wide as the previous value minus one bit.
pub fn log_bucket(prev: u64) -> u32 {
    bit_length(prev).saturating_sub(1)
}

pub struct HavenBucket<C> {
    code: C,
    initial_bucket_size: u32,
    bucket_size: BucketSizeFn,
}

impl<C: UniversalCode> HavenBucket<C> {
    pub fn new(code: C, initial_bucket_size: u32) -> Self {
        Self::with_bucket_fn(code, initial_bucket_size, log_bucket)
    }

    pub fn with_bucket_fn(code: C, initial_bucket_size: u32, bucket_size: BucketSizeFn) -> Self {
        Self {
            code,
            initial_bucket_size,
            bucket_size,
        }
    }

    fn next_bucket(&self, prev: u64) -> u32 {
        (self.bucket_size)(prev).min(63)
    }

    pub fn encode_into(&self, values: &[u64], out: &mut BitWriter) -> Result<()> {
        let mut hb = self.initial_bucket_size.min(63);
        for &n in values {
            encode_unsigned(&self.code, n >> hb, out)?;
            out.push_bits(n, hb);
            hb = self.next_bucket(n);
        }
        Ok(())
    }

    pub fn encode_seq(&self, values: &[u64]) -> Result<Vec<u8>> {
        let mut out = BitWriter::new();
        self.encode_into(values, &mut out)?;
        Ok(out.into_bits())
    }

    pub fn decode_from(&self, input: &mut BitReader<'_>) -> Result<Vec<u64>> {
        let mut out = Vec::new();
        let mut hb = self.initial_bucket_size.min(63);
        while let Some(high) = decode_unsigned(&self.code, input)? {
            if hb > 0 && high.leading_zeros() < hb {
                return Err(CerError::parse(format!("haven bucket: high part {high} overflows with {hb} low bits")));
            }
            let low = input.read_bits(hb)?;
            let n = (high << hb) | low;
            out.push(n);
            hb = self.next_bucket(n);
        }
        Ok(out)
    }

    pub fn decode_seq(&self, bits: &[u8]) -> Result<Vec<u64>> {
        self.decode_from(&mut BitReader::new(bits))
    }
}
