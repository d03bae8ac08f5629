// crates/cer-core/src/cer/scoring.rs
//
// A cell's score measures how far it is from the current prediction; cells
// with the lowest score are the least likely to hold the true value and are
// eliminated first.

use std::cmp::Ordering;

use crate::spline::{DistanceFn, Spline};

/// Columns either side of a cell considered by the 2-D scorings.
pub const CURVE_WINDOW: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scoring {
    /// V - |prediction - y|
    #[default]
    Vertical,
    /// V - Euclidean distance to the predicted curve.
    AbsoluteDistance,
    ManhattanDistance,
    AxialLogDistance,
}

impl Scoring {
    pub fn to_u8(self) -> u8 {
        match self {
            Scoring::Vertical => 0,
            Scoring::AbsoluteDistance => 1,
            Scoring::ManhattanDistance => 2,
            Scoring::AxialLogDistance => 3,
        }
    }

    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            0 => Some(Scoring::Vertical),
            1 => Some(Scoring::AbsoluteDistance),
            2 => Some(Scoring::ManhattanDistance),
            3 => Some(Scoring::AxialLogDistance),
            _ => None,
        }
    }

    /// How many neighbouring columns a score reads.
    pub fn window(self) -> usize {
        match self {
            Scoring::Vertical => 0,
            _ => CURVE_WINDOW,
        }
    }

    fn metric(self) -> DistanceFn {
        match self {
            Scoring::Vertical | Scoring::AbsoluteDistance => DistanceFn::Euclidean,
            Scoring::ManhattanDistance => DistanceFn::Manhattan,
            Scoring::AxialLogDistance => DistanceFn::AxialLog,
        }
    }

    pub fn score(self, spline: &mut Spline, x: usize, y: u32) -> Score {
        let v = spline.value_range() as f64;
        let y = y as i64;
        if self == Scoring::Vertical {
            let p = spline.predict(x);
            return Score(v - (p - y).abs() as f64);
        }

        let metric = self.metric();
        let lo = x.saturating_sub(CURVE_WINDOW);
        let hi = (x + CURVE_WINDOW).min(spline.len() - 1);
        let d = (lo..=hi)
            .map(|cx| {
                let p = spline.predict(cx);
                metric.measure(cx as f64 - x as f64, (p - y) as f64)
            })
            .fold(f64::INFINITY, f64::min);
        Score(v - d)
    }
}

/// Totally ordered score.
#[derive(Clone, Copy, Debug)]
pub struct Score(pub f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
