// crates/cer-core/src/spline/mod.rs
//
// Spline predictor over N positions with values in [0, V).
//
// Positions holding a known value are "bones"; every other position is
// predicted from the (up to) four bones around it: [L2, L1, R1, R2]. Both
// endpoints are bones from construction on, so every interior position has
// L1 and R1.
//
// Predictions are a pure function of the bones. The lookup policy and the
// value cache only change how fast that function is evaluated.

pub mod filter;
pub mod lookup;
pub mod method;

use std::collections::HashMap;

use tracing::trace;

use crate::error::{CerError, Result};

pub use filter::{filters_from_flags, filters_to_flags, OutputFilter};
pub use lookup::BoneLookup;
pub use method::{DistanceFn, InterpolationMethod, MAX_IDW_POWER};

use filter::FilterChain;
use lookup::BoneIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bone {
    pub x: usize,
    pub y: i64,
}

/// [L2, L1, R1, R2]
pub type Surroundings = [Option<Bone>; 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EndpointInit {
    #[default]
    Zero,
    /// ⌊(V - 1) / 2⌋
    Middle,
    /// V - 1
    Maximum,
    Literal(i64),
}

impl EndpointInit {
    fn value(self, value_range: u64) -> i64 {
        let top = value_range.saturating_sub(1) as i64;
        match self {
            EndpointInit::Zero => 0,
            EndpointInit::Middle => top / 2,
            EndpointInit::Maximum => top,
            EndpointInit::Literal(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplineConfig {
    pub method: InterpolationMethod,
    pub filters: Vec<OutputFilter>,
    pub endpoints: EndpointInit,
    pub lookup: BoneLookup,
    pub value_cache: bool,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::Linear,
            filters: vec![OutputFilter::Round],
            endpoints: EndpointInit::Zero,
            lookup: BoneLookup::default(),
            value_cache: false,
        }
    }
}

/// Memoized predictions keyed by a packed surroundings tuple, then position.
#[derive(Clone, Debug, Default)]
struct ValueCache {
    entries: HashMap<u128, HashMap<usize, i64>>,
    hits: u64,
}

#[derive(Clone, Debug)]
pub struct Spline {
    len: usize,
    value_range: u64,
    bones: Vec<Option<i64>>,
    bone_count: usize,
    method: InterpolationMethod,
    chain: FilterChain,
    index: BoneIndex,
    cache: Option<ValueCache>,
}

impl Spline {
    pub fn new(len: usize, value_range: u64, config: &SplineConfig) -> Result<Self> {
        if value_range == 0 {
            return Err(CerError::validation("spline value range must be at least 1"));
        }
        if let InterpolationMethod::InverseDistanceWeighted { power, .. } = config.method {
            if power == 0 || power > MAX_IDW_POWER {
                return Err(CerError::validation(format!(
                    "idw power must be in 1..={MAX_IDW_POWER}, got {power}"
                )));
            }
        }

        let mut spline = Self {
            len,
            value_range,
            bones: vec![None; len],
            bone_count: 0,
            method: config.method,
            chain: FilterChain::compile(&config.filters),
            index: BoneIndex::new(config.lookup, len),
            cache: config.value_cache.then(ValueCache::default),
        };

        if len > 0 {
            let init = config.endpoints.value(value_range);
            spline.set(0, init);
            spline.set(len - 1, init);
        }
        Ok(spline)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn value_range(&self) -> u64 {
        self.value_range
    }

    pub fn bone(&self, x: usize) -> Option<i64> {
        self.bones.get(x).copied().flatten()
    }

    pub fn is_bone(&self, x: usize) -> bool {
        self.bone(x).is_some()
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache.as_ref().map_or(0, |c| c.hits)
    }

    /// Install (or overwrite) a bone.
    pub fn set(&mut self, x: usize, y: i64) {
        debug_assert!(x < self.len);
        if self.cache.is_some() && self.bones[x].is_none() {
            let key = self.surroundings_hash(&self.surroundings(x));
            if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
                cache.entries.remove(&key);
            }
        }
        if self.bones[x].is_none() {
            self.bone_count += 1;
            self.index.insert(x);
        }
        self.bones[x] = Some(y);
        trace!(x, y, "spline bone");
    }

    /// Bones around `x`, excluding `x` itself.
    pub fn surroundings(&self, x: usize) -> Surroundings {
        let l1 = self.index.left_of(&self.bones, x);
        let r1 = self.index.right_of(&self.bones, x);
        let l2 = l1.and_then(|l| self.index.left_of(&self.bones, l));
        let r2 = r1.and_then(|r| self.index.right_of(&self.bones, r));
        [l2, l1, r1, r2].map(|p| p.map(|x| Bone { x, y: self.bones[x].unwrap_or(0) }))
    }

    /// Inclusive range of positions whose prediction can change when a bone
    /// is installed at `x`: everything strictly inside (L2, R2).
    pub fn influence_span(&self, x: usize) -> (usize, usize) {
        let s = self.surroundings(x);
        let lo = s[0].map_or(0, |b| b.x + 1);
        let hi = s[3].map_or(self.len.saturating_sub(1), |b| b.x.saturating_sub(1));
        (lo.min(x), hi.max(x))
    }

    /// Prediction at `x`; the bone value itself if `x` is a bone.
    pub fn predict(&mut self, x: usize) -> i64 {
        if let Some(y) = self.bones[x] {
            return y;
        }
        let s = self.surroundings(x);
        let key = match self.cache {
            Some(_) => self.surroundings_hash(&s),
            None => None,
        };
        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
            if let Some(&v) = cache.entries.get(&key).and_then(|m| m.get(&x)) {
                cache.hits += 1;
                return v;
            }
        }

        let v = self.compute(x, &s);

        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
            cache.entries.entry(key).or_default().insert(x, v);
        }
        v
    }

    /// Uncached prediction; never mutates.
    pub fn peek(&self, x: usize) -> i64 {
        match self.bones[x] {
            Some(y) => y,
            None => self.compute(x, &self.surroundings(x)),
        }
    }

    fn compute(&self, x: usize, s: &Surroundings) -> i64 {
        let raw = self.method.interpolate(x, s, self.chain.monotonic());
        let v = self.chain.apply(raw, s, self.value_range);
        if v.is_finite() {
            v.floor() as i64
        } else {
            0
        }
    }

    /// Pack the surroundings into one integer: each bone flattens to
    /// `x * V + y`, absent bones to `N * V`; the four are sorted and read as
    /// digits in base `N * V + 1`. `None` when a bone lies outside [0, V) or
    /// the packing would not fit, in which case the prediction is not cached.
    fn surroundings_hash(&self, s: &Surroundings) -> Option<u128> {
        let v = self.value_range as u128;
        let null = (self.len as u128).checked_mul(v)?;
        let base = null + 1;
        if base >= 1 << 32 {
            return None;
        }
        let mut digits = [0u128; 4];
        for (d, b) in digits.iter_mut().zip(s) {
            *d = match b {
                None => null,
                Some(b) if b.y >= 0 && (b.y as u128) < v => b.x as u128 * v + b.y as u128,
                Some(_) => return None,
            };
        }
        digits.sort_unstable();
        Some(digits.iter().fold(0u128, |acc, &d| acc * base + d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(method: InterpolationMethod, filters: Vec<OutputFilter>) -> SplineConfig {
        SplineConfig {
            method,
            filters,
            ..SplineConfig::default()
        }
    }

    #[test]
    fn linear_round_between_endpoints() {
        let mut s = Spline::new(5, 16, &config(InterpolationMethod::Linear, vec![OutputFilter::Round])).unwrap();
        s.set(0, 10);
        s.set(4, 12);
        assert_eq!(s.predict(2), 11);
        assert_eq!(s.predict(1), 11); // 10.5 rounds up
        assert_eq!(s.predict(3), 12); // 11.5
    }

    #[test]
    fn endpoint_init_policies() {
        for (init, expect) in [
            (EndpointInit::Zero, 0),
            (EndpointInit::Middle, 7),
            (EndpointInit::Maximum, 15),
            (EndpointInit::Literal(3), 3),
        ] {
            let cfg = SplineConfig {
                endpoints: init,
                ..SplineConfig::default()
            };
            let s = Spline::new(4, 16, &cfg).unwrap();
            assert_eq!((s.bone(0), s.bone(3)), (Some(expect), Some(expect)));
            assert_eq!(s.bone_count(), 2);
        }
    }

    #[test]
    fn tiny_lengths() {
        let mut one = Spline::new(1, 4, &SplineConfig::default()).unwrap();
        assert_eq!(one.predict(0), 0);
        assert_eq!(one.bone_count(), 1);
        let mut two = Spline::new(2, 4, &SplineConfig::default()).unwrap();
        two.set(1, 3);
        assert_eq!(two.predict(1), 3);
        assert!(Spline::new(0, 4, &SplineConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn global_clip_bounds_overshoot() {
        let cfg = config(
            InterpolationMethod::CubicHermite,
            vec![OutputFilter::GlobalClip, OutputFilter::Round],
        );
        let mut s = Spline::new(9, 10, &cfg).unwrap();
        s.set(0, 0);
        s.set(2, 9);
        s.set(4, 9);
        s.set(8, 0);
        for x in 0..9 {
            let p = s.predict(x);
            assert!((0..10).contains(&p), "x={x} p={p}");
        }
    }

    #[test]
    fn influence_span_covers_outer_gaps() {
        let mut s = Spline::new(20, 8, &SplineConfig::default()).unwrap();
        s.set(5, 1);
        s.set(10, 2);
        s.set(15, 3);
        // installing at 12: L1 = 10, L2 = 5, R1 = 15, R2 = 19
        assert_eq!(s.influence_span(12), (6, 18));
    }
}
