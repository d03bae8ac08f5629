// crates/cer-core/tests/spline_policies.rs
//
// Predictions must not depend on how bones are looked up or whether values
// are cached.

use cer_core::spline::{
    BoneLookup, DistanceFn, EndpointInit, InterpolationMethod, OutputFilter, Spline, SplineConfig,
};

fn lcg_next(x: &mut u64) -> u64 {
    // deterministic, not crypto
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

fn methods() -> Vec<InterpolationMethod> {
    let mut m = vec![
        InterpolationMethod::Hold,
        InterpolationMethod::NearestNeighbor,
        InterpolationMethod::Linear,
        InterpolationMethod::Sinusoidal,
        InterpolationMethod::CubicHermite,
    ];
    for distance in [DistanceFn::Euclidean, DistanceFn::Manhattan, DistanceFn::AxialLog] {
        for power in 1..=3 {
            m.push(InterpolationMethod::InverseDistanceWeighted { power, distance });
        }
    }
    m
}

fn variants(method: InterpolationMethod, filters: &[OutputFilter]) -> Vec<SplineConfig> {
    let mut out = Vec::new();
    for lookup in [BoneLookup::Scan, BoneLookup::NearbyLocation, BoneLookup::Distance] {
        for value_cache in [false, true] {
            out.push(SplineConfig {
                method,
                filters: filters.to_vec(),
                endpoints: EndpointInit::Middle,
                lookup,
                value_cache,
            });
        }
    }
    out
}

#[test]
fn predictions_identical_across_lookup_and_cache_policies() {
    let len = 97;
    let v = 200u64;
    let filter_sets: [&[OutputFilter]; 3] = [
        &[OutputFilter::Round],
        &[OutputFilter::SpanClip, OutputFilter::Round],
        &[OutputFilter::GlobalClip, OutputFilter::Monotonic],
    ];

    let mut seed = 0x00c0_ffee;
    for method in methods() {
        for filters in filter_sets {
            let mut splines: Vec<Spline> = variants(method, filters)
                .iter()
                .map(|c| Spline::new(len, v, c).unwrap())
                .collect();

            for round in 0..40 {
                let x = (lcg_next(&mut seed) % len as u64) as usize;
                let y = (lcg_next(&mut seed) % v) as i64;

                // query everything twice so cached entries are exercised
                for _ in 0..2 {
                    for q in 0..len {
                        let expect = splines[0].predict(q);
                        for s in splines.iter_mut().skip(1) {
                            assert_eq!(s.predict(q), expect, "{method:?} {filters:?} round={round} q={q}");
                        }
                    }
                }
                for s in &mut splines {
                    s.set(x, y);
                }
            }
            assert!(splines[1].cache_hits() > 0);
        }
    }
}

#[test]
fn influence_span_bounds_the_changed_predictions() {
    let len = 64;
    let cfg = SplineConfig {
        method: InterpolationMethod::CubicHermite,
        filters: vec![OutputFilter::Round],
        ..SplineConfig::default()
    };
    let mut seed = 11;
    let mut s = Spline::new(len, 1000, &cfg).unwrap();
    for _ in 0..30 {
        let x = (lcg_next(&mut seed) % len as u64) as usize;
        let y = (lcg_next(&mut seed) % 1000) as i64;
        if s.is_bone(x) {
            continue;
        }
        let before: Vec<i64> = (0..len).map(|q| s.peek(q)).collect();
        let (lo, hi) = s.influence_span(x);
        s.set(x, y);
        for q in 0..len {
            if q < lo || q > hi {
                assert_eq!(s.peek(q), before[q], "x={x} q={q} span=({lo},{hi})");
            }
        }
    }
}

#[test]
fn span_clip_keeps_predictions_between_neighbours() {
    let cfg = SplineConfig {
        method: InterpolationMethod::CubicHermite,
        filters: vec![OutputFilter::SpanClip],
        ..SplineConfig::default()
    };
    let mut s = Spline::new(30, 100, &cfg).unwrap();
    for (x, y) in [(0, 0), (6, 90), (12, 95), (20, 10), (29, 99)] {
        s.set(x, y);
    }
    let free: Vec<usize> = (0..30).filter(|&q| !s.is_bone(q)).collect();
    for q in free {
        let [_, l1, r1, _] = s.surroundings(q);
        let p = s.predict(q);
        if let (Some(l), Some(r)) = (l1, r1) {
            assert!(p >= l.y.min(r.y) && p <= l.y.max(r.y), "q={q} p={p}");
        }
    }
}
