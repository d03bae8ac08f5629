// crates/cer-core/src/config/mod.rs

pub mod defaults;
pub mod format;

use crate::cer::Scoring;
use crate::codes::CodecId;
use crate::spline::{BoneLookup, EndpointInit, InterpolationMethod, OutputFilter, SplineConfig};

pub use defaults::default_config;
pub use format::{read_header, write_header, BlockHeader};

/// How the press data of a block is turned into bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressCoding {
    Universal(CodecId),
    HavenBucket { codec: CodecId, initial_bucket: u8 },
    Markov { order: u8, novelty: CodecId },
}

impl PressCoding {
    pub fn codec(self) -> CodecId {
        match self {
            PressCoding::Universal(c) => c,
            PressCoding::HavenBucket { codec, .. } => codec,
            PressCoding::Markov { novelty, .. } => novelty,
        }
    }

    pub(crate) fn tag(self) -> u8 {
        match self {
            PressCoding::Universal(_) => 0,
            PressCoding::HavenBucket { .. } => 1,
            PressCoding::Markov { .. } => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CerConfig {
    pub interpolation: InterpolationMethod,
    pub filters: Vec<OutputFilter>,
    pub scoring: Scoring,
    pub press_coding: PressCoding,
    /// Write the block's observed [min, max] and impose it on every column.
    pub impose_range: bool,

    // Local tuning; never written to a block and never changes the output.
    pub lookup: BoneLookup,
    pub value_cache: bool,
}

impl Default for CerConfig {
    fn default() -> Self {
        default_config()
    }
}

impl CerConfig {
    /// Spline configuration with both endpoints initialised to `endpoint`.
    pub fn spline_config(&self, endpoint: i64) -> SplineConfig {
        SplineConfig {
            method: self.interpolation,
            filters: self.filters.clone(),
            endpoints: EndpointInit::Literal(endpoint),
            lookup: self.lookup,
            value_cache: self.value_cache,
        }
    }
}
