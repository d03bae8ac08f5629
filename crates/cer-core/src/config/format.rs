// crates/cer-core/src/config/format.rs

use crate::bits::{ceil_log2, BitReader, BitWriter};
use crate::cer::Scoring;
use crate::codes::{read_required, CodecId, EliasGamma, UniversalCode};
use crate::config::PressCoding;
use crate::error::{CerError, Result};
use crate::spline::{filters_from_flags, filters_to_flags, DistanceFn, InterpolationMethod, OutputFilter};

/// Everything a decoder needs before the press data.
///
/// Bit layout (MSB first):
/// gamma(N + 1)
/// gamma(V)
/// interpolation:4
/// filter_flags:4      (span clip, global clip, round, monotonic)
/// scoring:2
/// press_tag:2         (0 universal, 1 haven bucket, 2 markov)
/// codec:4
/// [haven]  initial_bucket:4
/// [markov] order:2
/// range_flag:1
/// [range]  min:w max:w          w = ⌈log₂ V⌉
/// [N >= 1] endpoint_0:w
/// [N >= 2] endpoint_1:w
#[derive(Clone, Debug, PartialEq)]
pub struct BlockHeader {
    pub len: usize,
    pub value_range: u32,
    pub interpolation: InterpolationMethod,
    pub filters: Vec<OutputFilter>,
    pub scoring: Scoring,
    pub press_coding: PressCoding,
    pub range: Option<(u32, u32)>,
    /// Values of the first and last sample (equal when N = 1).
    pub endpoints: [u32; 2],
}

impl BlockHeader {
    pub fn value_width(&self) -> u32 {
        ceil_log2(self.value_range as u64)
    }
}

pub fn interpolation_id(m: InterpolationMethod) -> u8 {
    match m {
        InterpolationMethod::Hold => 0,
        InterpolationMethod::NearestNeighbor => 1,
        InterpolationMethod::Linear => 2,
        InterpolationMethod::Sinusoidal => 3,
        InterpolationMethod::CubicHermite => 4,
        InterpolationMethod::InverseDistanceWeighted { power, distance } => {
            5 + distance.index() * 3 + power.clamp(1, 3) - 1
        }
    }
}

pub fn interpolation_from_id(id: u8) -> Result<InterpolationMethod> {
    Ok(match id {
        0 => InterpolationMethod::Hold,
        1 => InterpolationMethod::NearestNeighbor,
        2 => InterpolationMethod::Linear,
        3 => InterpolationMethod::Sinusoidal,
        4 => InterpolationMethod::CubicHermite,
        5..=13 => {
            let k = id - 5;
            let distance = DistanceFn::from_index(k / 3)
                .ok_or_else(|| CerError::parse(format!("bad interpolation id {id}")))?;
            InterpolationMethod::InverseDistanceWeighted {
                power: k % 3 + 1,
                distance,
            }
        }
        _ => return Err(CerError::parse(format!("unknown interpolation id {id}"))),
    })
}

pub fn write_header(h: &BlockHeader, out: &mut BitWriter) -> Result<()> {
    let gamma = EliasGamma::new();
    gamma.encode(h.len as u64 + 1, out)?;
    gamma.encode(h.value_range as u64, out)?;

    out.push_bits(interpolation_id(h.interpolation) as u64, 4);
    out.push_bits(filters_to_flags(&h.filters) as u64, 4);
    out.push_bits(h.scoring.to_u8() as u64, 2);

    out.push_bits(h.press_coding.tag() as u64, 2);
    out.push_bits(h.press_coding.codec().to_u8() as u64, 4);
    match h.press_coding {
        PressCoding::Universal(_) => {}
        PressCoding::HavenBucket { initial_bucket, .. } => out.push_bits(initial_bucket as u64, 4),
        PressCoding::Markov { order, .. } => out.push_bits(order as u64, 2),
    }

    let w = h.value_width();
    out.push(h.range.is_some());
    if let Some((min, max)) = h.range {
        out.push_bits(min as u64, w);
        out.push_bits(max as u64, w);
    }

    if h.len >= 1 {
        out.push_bits(h.endpoints[0] as u64, w);
    }
    if h.len >= 2 {
        out.push_bits(h.endpoints[1] as u64, w);
    }
    Ok(())
}

pub fn read_header(input: &mut BitReader<'_>) -> Result<BlockHeader> {
    let gamma = EliasGamma::new();
    let len = read_required(&gamma, input)? - 1;
    let len = usize::try_from(len).map_err(|_| CerError::parse("block length overflows"))?;
    let value_range = u32::try_from(read_required(&gamma, input)?)
        .map_err(|_| CerError::parse("value range overflows"))?;

    let interpolation = interpolation_from_id(input.read_bits(4)? as u8)?;
    let filters = filters_from_flags(input.read_bits(4)? as u8);
    let scoring = Scoring::from_u8(input.read_bits(2)? as u8)
        .ok_or_else(|| CerError::parse("unknown scoring id"))?;

    let tag = input.read_bits(2)? as u8;
    let codec = CodecId::from_u8(input.read_bits(4)? as u8)?;
    let press_coding = match tag {
        0 => PressCoding::Universal(codec),
        1 => PressCoding::HavenBucket {
            codec,
            initial_bucket: input.read_bits(4)? as u8,
        },
        2 => PressCoding::Markov {
            order: input.read_bits(2)? as u8,
            novelty: codec,
        },
        _ => return Err(CerError::parse(format!("unknown press coding tag {tag}"))),
    };

    let w = ceil_log2(value_range as u64);
    let has_range = input
        .read_bit()
        .ok_or_else(|| CerError::parse("header ends before range flag"))?;
    let range = if has_range {
        let min = input.read_bits(w)? as u32;
        let max = input.read_bits(w)? as u32;
        Some((min, max))
    } else {
        None
    };

    let e0 = if len >= 1 { input.read_bits(w)? as u32 } else { 0 };
    let e1 = if len >= 2 { input.read_bits(w)? as u32 } else { e0 };

    Ok(BlockHeader {
        len,
        value_range,
        interpolation,
        filters,
        scoring,
        press_coding,
        range,
        endpoints: [e0, e1],
    })
}
