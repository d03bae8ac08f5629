// crates/cer-core/src/spline/filter.rs

use crate::spline::Surroundings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFilter {
    /// Clamp between the two neighbouring bone values.
    SpanClip,
    /// Clamp into [0, V-1].
    GlobalClip,
    /// Round half away from zero.
    Round,
    /// Constrain Hermite slopes; affects interpolation rather than output.
    Monotonic,
}

impl OutputFilter {
    pub const ALL: [OutputFilter; 4] = [
        OutputFilter::SpanClip,
        OutputFilter::GlobalClip,
        OutputFilter::Round,
        OutputFilter::Monotonic,
    ];

    pub fn flag(self) -> u8 {
        match self {
            OutputFilter::SpanClip => 0b0001,
            OutputFilter::GlobalClip => 0b0010,
            OutputFilter::Round => 0b0100,
            OutputFilter::Monotonic => 0b1000,
        }
    }
}

pub fn filters_to_flags(filters: &[OutputFilter]) -> u8 {
    filters.iter().fold(0, |acc, f| acc | f.flag())
}

pub fn filters_from_flags(flags: u8) -> Vec<OutputFilter> {
    OutputFilter::ALL
        .into_iter()
        .filter(|f| flags & f.flag() != 0)
        .collect()
}

/// Filters resolved once at construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct FilterChain {
    steps: Vec<OutputFilter>,
    monotonic: bool,
}

impl FilterChain {
    pub(crate) fn compile(filters: &[OutputFilter]) -> Self {
        let mut chain = FilterChain::default();
        for &f in filters {
            if f == OutputFilter::Monotonic {
                chain.monotonic = true;
            } else if !chain.steps.contains(&f) {
                chain.steps.push(f);
            }
        }
        chain
    }

    pub(crate) fn monotonic(&self) -> bool {
        self.monotonic
    }

    pub(crate) fn apply(&self, mut v: f64, s: &Surroundings, value_range: u64) -> f64 {
        for f in &self.steps {
            v = match f {
                OutputFilter::SpanClip => match (s[1], s[2]) {
                    (Some(l), Some(r)) => {
                        let (lo, hi) = if l.y <= r.y { (l.y, r.y) } else { (r.y, l.y) };
                        v.clamp(lo as f64, hi as f64)
                    }
                    _ => v,
                },
                OutputFilter::GlobalClip => v.clamp(0.0, value_range.saturating_sub(1) as f64),
                OutputFilter::Round => v.round(),
                OutputFilter::Monotonic => v,
            };
        }
        v
    }
}
