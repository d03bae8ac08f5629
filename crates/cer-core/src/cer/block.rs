// crates/cer-core/src/cer/block.rs
//
// One CER block as a bit string: header, then the press data under the
// configured press coding, to the end of the block.

use tracing::debug;

use crate::bits::{BitReader, BitWriter};
use crate::cer::state::{CerStats, CodecState};
use crate::codes::{decode_unsigned_seq, encode_unsigned_seq};
use crate::config::{read_header, write_header, BlockHeader, CerConfig, PressCoding};
use crate::error::Result;
use crate::post::MarkovCodec;
use crate::transform::HavenBucket;
use crate::validate::{validate_block_params, validate_config};

#[derive(Clone, Debug)]
pub struct EncodedBlock {
    pub bits: Vec<u8>,
    pub press: Vec<u64>,
    pub stats: CerStats,
}

#[derive(Clone, Debug)]
pub struct DecodedBlock {
    pub samples: Vec<u32>,
    pub header: BlockHeader,
    pub press: Vec<u64>,
    pub stats: CerStats,
}

/// Largest value any single press entry can take.
pub fn press_bound(len: usize, value_range: u32) -> u64 {
    (len as u64).saturating_mul(value_range.saturating_sub(1) as u64)
}

/// [min, max] of the block when imposing it removes enough cells to matter
/// and leaves every column more than three unknown cells.
pub fn observed_range(samples: &[u32], value_range: u32) -> Option<(u32, u32)> {
    if samples.len() < 3 {
        return None;
    }
    let min = *samples.iter().min()?;
    let max = *samples.iter().max()?;
    let narrows = min > 0 || max + 1 < value_range;
    (narrows && max - min >= 3).then_some((min, max))
}

/// Largest bleed rank the Markov novelty code can be asked for.
fn novelty_bound(bound: u64) -> u64 {
    bound.saturating_mul(2).saturating_add(2)
}

pub fn encode_press(coding: PressCoding, press: &[u64], bound: u64, out: &mut BitWriter) -> Result<()> {
    let bits = match coding {
        PressCoding::Universal(id) => encode_unsigned_seq(&id.build(bound.saturating_add(1))?, press)?,
        PressCoding::HavenBucket { codec, initial_bucket } => {
            HavenBucket::new(codec.build(bound.saturating_add(1))?, initial_bucket as u32).encode_seq(press)?
        }
        PressCoding::Markov { order, novelty } => {
            MarkovCodec::new(order as usize, novelty.build(novelty_bound(bound))?).encode_seq(press)?
        }
    };
    out.extend_from_bits(&bits);
    Ok(())
}

pub fn decode_press(coding: PressCoding, bound: u64, input: &mut BitReader<'_>) -> Result<Vec<u64>> {
    match coding {
        PressCoding::Universal(id) => decode_unsigned_seq(&id.build(bound.saturating_add(1))?, input.remaining()),
        PressCoding::HavenBucket { codec, initial_bucket } => {
            HavenBucket::new(codec.build(bound.saturating_add(1))?, initial_bucket as u32).decode_from(input)
        }
        PressCoding::Markov { order, novelty } => {
            MarkovCodec::new(order as usize, novelty.build(novelty_bound(bound))?).decode_from(input)
        }
    }
}

pub fn encode_block(samples: &[u32], value_range: u32, config: &CerConfig) -> Result<EncodedBlock> {
    validate_config(config)?;
    let range = if config.impose_range {
        observed_range(samples, value_range)
    } else {
        None
    };

    let mut state = CodecState::for_encode(samples, value_range, range, config)?;
    let press = state.encode()?;

    let header = BlockHeader {
        len: samples.len(),
        value_range,
        interpolation: config.interpolation,
        filters: config.filters.clone(),
        scoring: config.scoring,
        press_coding: config.press_coding,
        range,
        endpoints: match samples {
            [] => [0, 0],
            [only] => [*only, *only],
            [first, .., last] => [*first, *last],
        },
    };

    let mut out = BitWriter::new();
    write_header(&header, &mut out)?;
    let header_bits = out.len();
    encode_press(config.press_coding, &press, press_bound(samples.len(), value_range), &mut out)?;
    debug!(
        len = samples.len(),
        header_bits,
        press_bits = out.len() - header_bits,
        runs = press.len(),
        "block written"
    );

    Ok(EncodedBlock {
        bits: out.into_bits(),
        press,
        stats: state.stats(),
    })
}

/// Decode one block. `local` supplies the settings that are not stored in
/// the block (bone lookup, value cache); they never change the result.
pub fn decode_block(bits: &[u8], local: &CerConfig) -> Result<DecodedBlock> {
    let mut input = BitReader::new(bits);
    let header = read_header(&mut input)?;
    validate_block_params(header.len, header.value_range)?;

    let config = CerConfig {
        interpolation: header.interpolation,
        filters: header.filters.clone(),
        scoring: header.scoring,
        press_coding: header.press_coding,
        impose_range: header.range.is_some(),
        lookup: local.lookup,
        value_cache: local.value_cache,
    };
    validate_config(&config)?;

    let press = decode_press(
        header.press_coding,
        press_bound(header.len, header.value_range),
        &mut input,
    )?;

    let mut state = CodecState::for_decode(header.len, header.value_range, header.endpoints, header.range, &config)?;
    let samples = state.decode(&press)?;

    Ok(DecodedBlock {
        samples,
        header,
        press,
        stats: state.stats(),
    })
}
