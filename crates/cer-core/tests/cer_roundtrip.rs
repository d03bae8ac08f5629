// crates/cer-core/tests/cer_roundtrip.rs

use cer_core::cer::{decode_block, encode_block, press_bound, CodecState, Scoring};
use cer_core::bits::BitWriter;
use cer_core::codes::CodecId;
use cer_core::config::{default_config, write_header, BlockHeader, CerConfig, PressCoding};
use cer_core::error::CerError;
use cer_core::spline::{BoneLookup, DistanceFn, InterpolationMethod, OutputFilter};

fn lcg_next(x: &mut u64) -> u64 {
    // deterministic, not crypto
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

/// Bounded random walk, roughly what a band-limited PCM signal looks like.
fn walk(seed: &mut u64, n: usize, v: u32) -> Vec<u32> {
    let mut cur = (v / 2) as i64;
    (0..n)
        .map(|_| {
            let step = (lcg_next(seed) >> 61) as i64 - 3;
            cur = (cur + step).clamp(0, v as i64 - 1);
            cur as u32
        })
        .collect()
}

fn linear_round() -> CerConfig {
    CerConfig {
        interpolation: InterpolationMethod::Linear,
        filters: vec![OutputFilter::Round],
        scoring: Scoring::Vertical,
        press_coding: PressCoding::Universal(CodecId::EliasGamma),
        impose_range: false,
        ..default_config()
    }
}

fn roundtrip(samples: &[u32], v: u32, cfg: &CerConfig) -> Vec<u64> {
    let enc = encode_block(samples, v, cfg).unwrap();
    let dec = decode_block(&enc.bits, cfg).unwrap();
    assert_eq!(dec.samples, samples, "{cfg:?}");
    assert_eq!(dec.press, enc.press);

    // press invariants
    let total: u64 = enc.press.iter().sum();
    assert_eq!(total, enc.stats.eliminations);
    assert!(total <= press_bound(samples.len(), v));
    assert!(enc.press.len() <= samples.len().saturating_sub(1));
    assert_eq!(dec.stats.eliminations, enc.stats.eliminations);
    enc.press
}

#[test]
fn ramp_is_fully_absorbed_in_one_final_run() {
    let cfg = linear_round();
    let mut state = CodecState::for_encode(&[0, 1, 2, 3], 4, None, &cfg).unwrap();
    let press = state.encode().unwrap();
    assert_eq!(press, vec![6]);
    let stats = state.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.absorptions, 2);

    let mut dec = CodecState::for_decode(4, 4, [0, 3], None, &cfg).unwrap();
    assert_eq!(dec.decode(&press).unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn degenerate_blocks() {
    let cfg = linear_round();
    assert!(roundtrip(&[], 16, &cfg).is_empty());
    assert!(roundtrip(&[7], 16, &cfg).is_empty());
    assert!(roundtrip(&[7, 2], 16, &cfg).is_empty());
    // V = 1: every column is critical from the start
    assert!(roundtrip(&[0; 9], 1, &cfg).is_empty());
    // V = 2
    roundtrip(&[0, 1, 1, 0, 1, 0, 0, 1], 2, &cfg);
}

#[test]
fn every_interpolation_and_scoring_roundtrips() {
    let mut methods = vec![
        InterpolationMethod::Hold,
        InterpolationMethod::NearestNeighbor,
        InterpolationMethod::Linear,
        InterpolationMethod::Sinusoidal,
        InterpolationMethod::CubicHermite,
    ];
    for distance in [DistanceFn::Euclidean, DistanceFn::Manhattan, DistanceFn::AxialLog] {
        methods.push(InterpolationMethod::InverseDistanceWeighted { power: 2, distance });
    }
    let scorings = [
        Scoring::Vertical,
        Scoring::AbsoluteDistance,
        Scoring::ManhattanDistance,
        Scoring::AxialLogDistance,
    ];

    let mut seed = 0x1234_5678;
    for method in methods {
        for scoring in scorings {
            let cfg = CerConfig {
                interpolation: method,
                filters: vec![OutputFilter::GlobalClip, OutputFilter::Round],
                scoring,
                ..default_config()
            };
            let n = 20 + (lcg_next(&mut seed) % 30) as usize;
            let samples = walk(&mut seed, n, 32);
            roundtrip(&samples, 32, &cfg);
        }
    }
}

#[test]
fn every_press_coding_roundtrips() {
    let codings = [
        PressCoding::Universal(CodecId::Unary),
        PressCoding::Universal(CodecId::EliasDelta),
        PressCoding::Universal(CodecId::Enbonacci(3)),
        PressCoding::Universal(CodecId::EliasGammaFib),
        PressCoding::Universal(CodecId::EliasGammaIota),
        PressCoding::Universal(CodecId::EliasDeltaIota),
        PressCoding::HavenBucket {
            codec: CodecId::EliasGamma,
            initial_bucket: 2,
        },
        PressCoding::Markov {
            order: 0,
            novelty: CodecId::EliasGamma,
        },
        PressCoding::Markov {
            order: 2,
            novelty: CodecId::FIBONACCI,
        },
    ];
    let mut seed = 77;
    let samples = walk(&mut seed, 150, 64);
    let mut reference = None;
    for press_coding in codings {
        let cfg = CerConfig {
            press_coding,
            ..default_config()
        };
        let press = roundtrip(&samples, 64, &cfg);
        // the press data itself does not depend on how it is coded
        assert_eq!(reference.get_or_insert_with(|| press.clone()), &press);
    }
}

#[test]
fn filters_and_hermite_monotonic_roundtrip() {
    let mut seed = 3;
    let samples = walk(&mut seed, 80, 100);
    for filters in [
        vec![],
        vec![OutputFilter::SpanClip],
        vec![OutputFilter::SpanClip, OutputFilter::Round, OutputFilter::Monotonic],
    ] {
        let cfg = CerConfig {
            interpolation: InterpolationMethod::CubicHermite,
            filters,
            ..default_config()
        };
        roundtrip(&samples, 100, &cfg);
    }
}

#[test]
fn decoder_settings_outside_the_header_do_not_matter() {
    let mut seed = 21;
    let samples = walk(&mut seed, 120, 50);
    let enc = encode_block(&samples, 50, &default_config()).unwrap();
    for lookup in [BoneLookup::Scan, BoneLookup::NearbyLocation, BoneLookup::Distance] {
        for value_cache in [false, true] {
            let local = CerConfig {
                lookup,
                value_cache,
                ..linear_round()
            };
            assert_eq!(decode_block(&enc.bits, &local).unwrap().samples, samples);
        }
    }
}

#[test]
fn imposed_range_is_used_when_it_narrows() {
    let mut seed = 8;
    let samples: Vec<u32> = walk(&mut seed, 60, 40).into_iter().map(|s| s + 100).collect();
    let with = encode_block(&samples, 256, &default_config()).unwrap();
    let without = encode_block(
        &samples,
        256,
        &CerConfig {
            impose_range: false,
            ..default_config()
        },
    )
    .unwrap();
    let dec = decode_block(&with.bits, &default_config()).unwrap();
    assert!(dec.header.range.is_some());
    assert_eq!(dec.samples, samples);
    assert!(with.stats.eliminations < without.stats.eliminations);
}

#[test]
fn truncated_or_tampered_press_is_rejected() {
    let cfg = linear_round();
    let mut seed = 5;
    let samples = walk(&mut seed, 40, 16);
    let mut enc = CodecState::for_encode(&samples, 16, None, &cfg).unwrap();
    let press = enc.encode().unwrap();
    assert!(press.len() >= 2);
    let endpoints = [samples[0], samples[39]];

    let fresh = || CodecState::for_decode(40, 16, endpoints, None, &cfg).unwrap();

    let mut short = press.clone();
    short.pop();
    assert!(fresh().decode(&short).is_err());

    let mut off = press.clone();
    *off.last_mut().unwrap() += 1;
    assert!(matches!(fresh().decode(&off), Err(CerError::Integrity(_))));

    assert!(matches!(fresh().decode(&[]), Err(CerError::Parse(_))));
}

#[test]
fn out_of_range_samples_are_rejected() {
    let err = encode_block(&[1, 2, 16], 16, &linear_round()).unwrap_err();
    assert!(matches!(err, CerError::Validation(_)), "{err:?}");
}

#[test]
fn exactly_predicted_block_costs_a_single_run() {
    let samples: Vec<u32> = (0..100).map(|i| 20 + 2 * i).collect();
    let enc = encode_block(&samples, 256, &linear_round()).unwrap();
    assert_eq!(enc.stats.hits, 0);
    assert_eq!(enc.press, vec![98 * 255]);
    assert!(enc.bits.len() < 100, "{} bits", enc.bits.len());
    assert_eq!(decode_block(&enc.bits, &linear_round()).unwrap().samples, samples);
}

#[test]
fn oversized_header_dimensions_are_rejected_before_decoding() {
    let cfg = linear_round();
    for (len, value_range) in [(1usize << 62, 1u32 << 24), (10, u32::MAX), (1usize << 40, 2)] {
        let header = BlockHeader {
            len,
            value_range,
            interpolation: cfg.interpolation,
            filters: cfg.filters.clone(),
            scoring: cfg.scoring,
            press_coding: cfg.press_coding,
            range: None,
            endpoints: [0, 1],
        };
        let mut out = BitWriter::new();
        write_header(&header, &mut out).unwrap();
        out.push_bits(0b1, 1);
        let err = decode_block(out.bits(), &cfg).unwrap_err();
        assert!(matches!(err, CerError::Validation(_)), "{len} x {value_range}: {err:?}");
    }
    assert_eq!(press_bound(usize::MAX, u32::MAX), u64::MAX);
}
