// crates/cer-core/src/spline/method.rs

use std::f64::consts::PI;

use crate::spline::{Bone, Surroundings};

/// Distance between a query column and a bone.
///
/// Interpolation only measures along x (`dy = 0`), where Euclidean and
/// Manhattan coincide; both ids stay valid in block headers and decode to
/// the same predictions. The second axis is kept for `measure` callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceFn {
    Euclidean,
    Manhattan,
    /// ln(1 + |dx|) + ln(1 + |dy|)
    AxialLog,
}

impl DistanceFn {
    pub fn measure(self, dx: f64, dy: f64) -> f64 {
        let (dx, dy) = (dx.abs(), dy.abs());
        match self {
            DistanceFn::Euclidean => dx.hypot(dy),
            DistanceFn::Manhattan => dx + dy,
            DistanceFn::AxialLog => dx.ln_1p() + dy.ln_1p(),
        }
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            DistanceFn::Euclidean => 0,
            DistanceFn::Manhattan => 1,
            DistanceFn::AxialLog => 2,
        }
    }

    pub(crate) fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(DistanceFn::Euclidean),
            1 => Some(DistanceFn::Manhattan),
            2 => Some(DistanceFn::AxialLog),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMethod {
    /// Value of the nearest bone on the left.
    Hold,
    NearestNeighbor,
    Linear,
    /// Half-cosine ease between the neighbouring bones.
    Sinusoidal,
    /// Hermite segment with slopes averaged from the secants on each side.
    CubicHermite,
    /// Weighted mean of the surrounding bones, weight = 1 / distance^power.
    InverseDistanceWeighted { power: u8, distance: DistanceFn },
}

pub const MAX_IDW_POWER: u8 = 3;

impl InterpolationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationMethod::Hold => "hold",
            InterpolationMethod::NearestNeighbor => "nearest",
            InterpolationMethod::Linear => "linear",
            InterpolationMethod::Sinusoidal => "sinusoidal",
            InterpolationMethod::CubicHermite => "cubic-hermite",
            InterpolationMethod::InverseDistanceWeighted { .. } => "idw",
        }
    }

    /// Raw prediction at `x` before any output filter.
    pub(crate) fn interpolate(&self, x: usize, s: &Surroundings, monotonic: bool) -> f64 {
        let [l2, l1, r1, r2] = *s;
        let (l1, r1) = match (l1, r1) {
            (Some(l), Some(r)) => (l, r),
            (Some(b), None) | (None, Some(b)) => return b.y as f64,
            (None, None) => return 0.0,
        };

        let span = (r1.x - l1.x) as f64;
        let t = (x - l1.x) as f64 / span;
        let (y0, y1) = (l1.y as f64, r1.y as f64);

        match *self {
            InterpolationMethod::Hold => y0,
            InterpolationMethod::NearestNeighbor => {
                if t <= 0.5 {
                    y0
                } else {
                    y1
                }
            }
            InterpolationMethod::Linear => y0 + (y1 - y0) * t,
            InterpolationMethod::Sinusoidal => y0 + (y1 - y0) * 0.5 * (1.0 - (PI * t).cos()),
            InterpolationMethod::CubicHermite => hermite(t, l2, l1, r1, r2, monotonic),
            InterpolationMethod::InverseDistanceWeighted { power, distance } => {
                let mut num = 0.0;
                let mut den = 0.0;
                for b in s.iter().flatten() {
                    let d = distance.measure(x as f64 - b.x as f64, 0.0);
                    let w = 1.0 / d.powi(power as i32);
                    num += w * b.y as f64;
                    den += w;
                }
                num / den
            }
        }
    }
}

fn secant(a: Bone, b: Bone) -> f64 {
    (b.y - a.y) as f64 / (b.x - a.x) as f64
}

fn hermite(t: f64, l2: Option<Bone>, l1: Bone, r1: Bone, r2: Option<Bone>, monotonic: bool) -> f64 {
    let h = (r1.x - l1.x) as f64;
    let d = secant(l1, r1);
    let dl = l2.map(|b| secant(b, l1));
    let dr = r2.map(|b| secant(r1, b));

    let mut m0 = dl.map_or(d, |s| 0.5 * (s + d));
    let mut m1 = dr.map_or(d, |s| 0.5 * (s + d));

    if monotonic {
        let deltas = [dl, Some(d), dr];
        let all_pos = deltas.iter().flatten().all(|&s| s > 0.0);
        let all_neg = deltas.iter().flatten().all(|&s| s < 0.0);
        if d == 0.0 {
            m0 = 0.0;
            m1 = 0.0;
        } else if all_pos || all_neg {
            // Fritsch–Carlson: same sign as the secant, at most three times it.
            let limit = 3.0 * d.abs();
            m0 = m0.abs().min(limit) * d.signum();
            m1 = m1.abs().min(limit) * d.signum();
        }
    }

    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * l1.y as f64 + h10 * h * m0 + h01 * r1.y as f64 + h11 * h * m1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x: usize, y: i64) -> Option<Bone> {
        Some(Bone { x, y })
    }

    #[test]
    fn segment_methods_between_two_bones() {
        let s = [None, b(0, 0), b(4, 8), None];
        assert_eq!(InterpolationMethod::Hold.interpolate(3, &s, false), 0.0);
        assert_eq!(InterpolationMethod::NearestNeighbor.interpolate(1, &s, false), 0.0);
        assert_eq!(InterpolationMethod::NearestNeighbor.interpolate(3, &s, false), 8.0);
        assert_eq!(InterpolationMethod::Linear.interpolate(1, &s, false), 2.0);
        assert!((InterpolationMethod::Sinusoidal.interpolate(2, &s, false) - 4.0).abs() < 1e-9);
        // no outer bones: hermite slopes equal the secant, which is linear
        assert!((InterpolationMethod::CubicHermite.interpolate(1, &s, false) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn idw_weights_nearer_bones_more() {
        let s = [None, b(0, 0), b(4, 8), None];
        let m = InterpolationMethod::InverseDistanceWeighted {
            power: 2,
            distance: DistanceFn::Manhattan,
        };
        // weights 1 and 1/9
        let v = m.interpolate(1, &s, false);
        assert!((v - 0.8).abs() < 1e-9, "{v}");
    }

    #[test]
    fn euclidean_and_manhattan_idw_agree_along_x() {
        let s = [b(0, 3), b(5, 40), b(9, 11), b(20, 70)];
        let idw = |distance| InterpolationMethod::InverseDistanceWeighted { power: 2, distance };
        for x in [6, 7, 8] {
            let e = idw(DistanceFn::Euclidean).interpolate(x, &s, false);
            let m = idw(DistanceFn::Manhattan).interpolate(x, &s, false);
            assert_eq!(e, m, "x={x}");
        }
        let a = idw(DistanceFn::AxialLog).interpolate(6, &s, false);
        assert_ne!(a, idw(DistanceFn::Euclidean).interpolate(6, &s, false));
        assert_ne!(DistanceFn::Euclidean.measure(3.0, 4.0), DistanceFn::Manhattan.measure(3.0, 4.0));
    }
}
