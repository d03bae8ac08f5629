// crates/cer-core/src/transform/ruler.rs
//
// Ruler interlace: values are visited in bisection order (first, last, then
// midpoints of ever finer intervals). Each value is focus-folded around a
// prediction built from the values already visited, so smooth sequences turn
// into runs of small numbers.

use std::collections::VecDeque;

use crate::error::{CerError, Result};
use crate::spline::{InterpolationMethod, OutputFilter, Spline, SplineConfig};
use crate::transform::zigzag::{focus, unfocus};

/// Visit order for `n` positions: 0, n-1, then breadth-first midpoints.
pub fn ruler_order(n: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(n);
    if n == 0 {
        return order;
    }
    order.push(0);
    if n == 1 {
        return order;
    }
    order.push(n - 1);

    let mut queue = VecDeque::from([(0usize, n - 1)]);
    while let Some((lo, hi)) = queue.pop_front() {
        if hi - lo < 2 {
            continue;
        }
        let mid = lo + (hi - lo) / 2;
        order.push(mid);
        queue.push_back((lo, mid));
        queue.push_back((mid, hi));
    }
    order
}

struct Predictor {
    spline: Option<Spline>,
    first: u64,
}

impl Predictor {
    fn new(n: usize) -> Result<Self> {
        let spline = if n > 2 {
            let cfg = SplineConfig {
                method: InterpolationMethod::Linear,
                filters: vec![OutputFilter::Round],
                ..SplineConfig::default()
            };
            Some(Spline::new(n, i64::MAX as u64, &cfg)?)
        } else {
            None
        };
        Ok(Self { spline, first: 0 })
    }

    fn focus_at(&mut self, step: usize, x: usize) -> u64 {
        match step {
            0 => 0,
            1 => self.first,
            _ => self
                .spline
                .as_mut()
                .map_or(0, |s| s.predict(x).max(0) as u64),
        }
    }

    fn record(&mut self, step: usize, x: usize, v: u64) {
        if step == 0 {
            self.first = v;
        }
        if let Some(s) = self.spline.as_mut() {
            s.set(x, v as i64);
        }
    }
}

pub fn ruler_encode(values: &[u64]) -> Result<Vec<u64>> {
    if let Some(&v) = values.iter().find(|&&v| v > i64::MAX as u64) {
        return Err(CerError::Domain {
            value: v as i128,
            domain: crate::codes::Domain::Unsigned,
            codec: "ruler",
        });
    }
    let mut pred = Predictor::new(values.len())?;
    let mut out = Vec::with_capacity(values.len());
    for (step, x) in ruler_order(values.len()).into_iter().enumerate() {
        let f = pred.focus_at(step, x);
        out.push(focus(values[x], f));
        pred.record(step, x, values[x]);
    }
    Ok(out)
}

pub fn ruler_decode(coded: &[u64]) -> Result<Vec<u64>> {
    let mut pred = Predictor::new(coded.len())?;
    let mut out = vec![0u64; coded.len()];
    for (step, x) in ruler_order(coded.len()).into_iter().enumerate() {
        let f = pred.focus_at(step, x);
        let v = unfocus(coded[step], f)
            .ok_or_else(|| CerError::parse(format!("ruler: coded value {} overflows around {f}", coded[step])))?;
        if v > i64::MAX as u64 {
            return Err(CerError::parse(format!("ruler: decoded value {v} out of range")));
        }
        out[x] = v;
        pred.record(step, x, v);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisection_order() {
        assert_eq!(ruler_order(5), vec![0, 4, 2, 1, 3]);
        assert_eq!(ruler_order(2), vec![0, 1]);
        let mut all = ruler_order(37);
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn smooth_ramp_codes_small() {
        let coded = ruler_encode(&[10, 13, 11, 14, 12]).unwrap();
        assert_eq!(coded[0], 10);
        assert_eq!(coded[1], 4); // 12 focused on 10
        assert_eq!(ruler_decode(&coded).unwrap(), vec![10, 13, 11, 14, 12]);
    }
}
