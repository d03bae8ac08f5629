// crates/cer-core/src/config/defaults.rs

use crate::cer::Scoring;
use crate::codes::CodecId;
use crate::config::{CerConfig, PressCoding};
use crate::spline::{BoneLookup, InterpolationMethod, OutputFilter};

pub const DEFAULT_BLOCK_LEN: usize = 4096;
pub const DEFAULT_VALUE_RANGE: u32 = 256;

pub const MAX_VALUE_RANGE: u32 = 1 << 24;
pub const MAX_BLOCK_LEN: usize = 1 << 24;
pub const MAX_MARKOV_ORDER: u8 = 3;
pub const MAX_INITIAL_BUCKET: u8 = 15;

pub fn default_config() -> CerConfig {
    CerConfig {
        interpolation: InterpolationMethod::CubicHermite,
        filters: vec![OutputFilter::GlobalClip, OutputFilter::Round],
        scoring: Scoring::Vertical,
        press_coding: PressCoding::Universal(CodecId::EliasGamma),
        impose_range: true,
        lookup: BoneLookup::NearbyLocation,
        value_cache: true,
    }
}
