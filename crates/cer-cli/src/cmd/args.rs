// crates/cer-cli/src/cmd/args.rs
//
// Codec flags shared by the subcommands, mapped onto CerConfig.

use clap::{Args, ValueEnum};

use cer_core::cer::Scoring;
use cer_core::codes::CodecId;
use cer_core::config::{default_config, CerConfig, PressCoding};
use cer_core::spline::{BoneLookup, DistanceFn, InterpolationMethod, OutputFilter};
use cer_core::validate::validate_config;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Interp {
    Hold,
    Nearest,
    Linear,
    Sinusoidal,
    CubicHermite,
    /// Inverse distance weighting over the four surrounding bones
    Idw,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Distance {
    Euclidean,
    Manhattan,
    AxialLog,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    SpanClip,
    GlobalClip,
    Round,
    Monotonic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScoringArg {
    Vertical,
    Absolute,
    Manhattan,
    AxialLog,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Codec {
    Unary,
    Gamma,
    Delta,
    Fibonacci,
    /// Higher-order Fibonacci; order from --enbonacci-order
    Enbonacci,
    GammaFib,
    DeltaFib,
    GammaIota,
    DeltaIota,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Press {
    Universal,
    Haven,
    Markov,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Lookup {
    Scan,
    Nearby,
    Distance,
}

#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Spline interpolation used to predict unresolved samples
    #[arg(long, value_enum, default_value_t = Interp::CubicHermite)]
    pub interp: Interp,

    /// IDW power (1..=3), only used with --interp idw
    #[arg(long, default_value_t = 2)]
    pub idw_power: u8,

    /// IDW distance function, only used with --interp idw
    #[arg(long, value_enum, default_value_t = Distance::Euclidean)]
    pub distance: Distance,

    /// Output filters, comma separated, applied in canonical order
    #[arg(long = "filter", value_enum, value_delimiter = ',', default_values_t = [Filter::GlobalClip, Filter::Round])]
    pub filters: Vec<Filter>,

    /// Disable every output filter (overrides --filter)
    #[arg(long, default_value_t = false)]
    pub no_filters: bool,

    /// How candidate cells are ranked
    #[arg(long, value_enum, default_value_t = ScoringArg::Vertical)]
    pub scoring: ScoringArg,

    /// Universal code for the press data (novelty code under --press markov)
    #[arg(long, value_enum, default_value_t = Codec::Gamma)]
    pub codec: Codec,

    /// Order for --codec enbonacci (2..=8)
    #[arg(long, default_value_t = 3)]
    pub enbonacci_order: u8,

    /// Press data coding
    #[arg(long, value_enum, default_value_t = Press::Universal)]
    pub press: Press,

    /// Initial bucket width in bits for --press haven
    #[arg(long, default_value_t = 2)]
    pub initial_bucket: u8,

    /// Context order for --press markov (0..=3)
    #[arg(long, default_value_t = 1)]
    pub markov_order: u8,

    /// Do not impose the observed [min, max] of each block
    #[arg(long, default_value_t = false)]
    pub no_range: bool,
}

/// Decoder settings that are never stored in a block.
#[derive(Args, Debug, Clone)]
pub struct LocalArgs {
    /// How the spline finds neighbouring bones
    #[arg(long, value_enum, default_value_t = Lookup::Nearby)]
    pub lookup: Lookup,

    /// Disable the prediction cache
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,
}

impl Default for LocalArgs {
    fn default() -> Self {
        Self {
            lookup: Lookup::Nearby,
            no_cache: false,
        }
    }
}

impl LocalArgs {
    pub fn apply(&self, cfg: &mut CerConfig) {
        cfg.lookup = match self.lookup {
            Lookup::Scan => BoneLookup::Scan,
            Lookup::Nearby => BoneLookup::NearbyLocation,
            Lookup::Distance => BoneLookup::Distance,
        };
        cfg.value_cache = !self.no_cache;
    }

    pub fn to_config(&self) -> CerConfig {
        let mut cfg = default_config();
        self.apply(&mut cfg);
        cfg
    }
}

impl CodecArgs {
    fn codec_id(&self) -> CodecId {
        match self.codec {
            Codec::Unary => CodecId::Unary,
            Codec::Gamma => CodecId::EliasGamma,
            Codec::Delta => CodecId::EliasDelta,
            Codec::Fibonacci => CodecId::FIBONACCI,
            Codec::Enbonacci => CodecId::Enbonacci(self.enbonacci_order),
            Codec::GammaFib => CodecId::EliasGammaFib,
            Codec::DeltaFib => CodecId::EliasDeltaFib,
            Codec::GammaIota => CodecId::EliasGammaIota,
            Codec::DeltaIota => CodecId::EliasDeltaIota,
        }
    }

    pub fn to_config(&self, local: &LocalArgs) -> anyhow::Result<CerConfig> {
        let interpolation = match self.interp {
            Interp::Hold => InterpolationMethod::Hold,
            Interp::Nearest => InterpolationMethod::NearestNeighbor,
            Interp::Linear => InterpolationMethod::Linear,
            Interp::Sinusoidal => InterpolationMethod::Sinusoidal,
            Interp::CubicHermite => InterpolationMethod::CubicHermite,
            Interp::Idw => InterpolationMethod::InverseDistanceWeighted {
                power: self.idw_power,
                distance: match self.distance {
                    Distance::Euclidean => DistanceFn::Euclidean,
                    Distance::Manhattan => DistanceFn::Manhattan,
                    Distance::AxialLog => DistanceFn::AxialLog,
                },
            },
        };

        let mut filters = Vec::new();
        if !self.no_filters {
            for f in &self.filters {
                let f = match f {
                    Filter::SpanClip => OutputFilter::SpanClip,
                    Filter::GlobalClip => OutputFilter::GlobalClip,
                    Filter::Round => OutputFilter::Round,
                    Filter::Monotonic => OutputFilter::Monotonic,
                };
                // repeated flags are harmless on the command line
                if !filters.contains(&f) {
                    filters.push(f);
                }
            }
        }

        let scoring = match self.scoring {
            ScoringArg::Vertical => Scoring::Vertical,
            ScoringArg::Absolute => Scoring::AbsoluteDistance,
            ScoringArg::Manhattan => Scoring::ManhattanDistance,
            ScoringArg::AxialLog => Scoring::AxialLogDistance,
        };

        let codec = self.codec_id();
        let press_coding = match self.press {
            Press::Universal => PressCoding::Universal(codec),
            Press::Haven => PressCoding::HavenBucket {
                codec,
                initial_bucket: self.initial_bucket,
            },
            Press::Markov => PressCoding::Markov {
                order: self.markov_order,
                novelty: codec,
            },
        };

        let mut cfg = CerConfig {
            interpolation,
            filters,
            scoring,
            press_coding,
            impose_range: !self.no_range,
            ..default_config()
        };
        local.apply(&mut cfg);
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> CodecArgs {
        CodecArgs {
            interp: Interp::CubicHermite,
            idw_power: 2,
            distance: Distance::Euclidean,
            filters: vec![Filter::GlobalClip, Filter::Round],
            no_filters: false,
            scoring: ScoringArg::Vertical,
            codec: Codec::Gamma,
            enbonacci_order: 3,
            press: Press::Universal,
            initial_bucket: 2,
            markov_order: 1,
            no_range: false,
        }
    }

    #[test]
    fn default_flags_match_the_library_defaults() {
        let cfg = defaults().to_config(&LocalArgs::default()).unwrap();
        assert_eq!(cfg, default_config());
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        let mut a = defaults();
        a.interp = Interp::Linear;
        a.filters = vec![Filter::Monotonic];
        assert!(a.to_config(&LocalArgs::default()).is_err());

        let mut b = defaults();
        b.codec = Codec::Enbonacci;
        b.enbonacci_order = 9;
        assert!(b.to_config(&LocalArgs::default()).is_err());

        let mut c = defaults();
        c.press = Press::Markov;
        c.markov_order = 4;
        assert!(c.to_config(&LocalArgs::default()).is_err());
    }
}
