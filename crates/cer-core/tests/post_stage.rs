// crates/cer-core/tests/post_stage.rs

use cer_core::codes::{encode_unsigned_seq, EliasDelta, EliasGamma};
use cer_core::post::{BleedSorted, Histogram, HuffmanCode, MarkovCodec};

fn lcg_next(x: &mut u64) -> u64 {
    // deterministic, not crypto
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

/// Skewed source: small values common, occasional large outliers.
fn skewed(seed: &mut u64, n: usize) -> Vec<u64> {
    (0..n)
        .map(|_| {
            let r = lcg_next(seed) >> 32;
            match r % 16 {
                0..=7 => 3,
                8..=11 => 4,
                12..=14 => r % 9,
                _ => 1000 + r % 5000,
            }
        })
        .collect()
}

#[test]
fn markov_roundtrips_for_each_order() {
    let mut seed = 0xdead_beef;
    let values = skewed(&mut seed, 600);
    for order in 0..=3 {
        let codec = MarkovCodec::new(order, EliasDelta::new());
        let bits = codec.encode_seq(&values).unwrap();
        assert_eq!(codec.decode_seq(&bits).unwrap(), values, "order {order}");
    }
}

#[test]
fn markov_beats_a_static_universal_code_on_skewed_data() {
    let mut seed = 1;
    let values: Vec<u64> = skewed(&mut seed, 2000).into_iter().map(|v| v + 40).collect();
    let markov = MarkovCodec::new(0, EliasGamma::new()).encode_seq(&values).unwrap();
    let gamma = encode_unsigned_seq(&EliasGamma::new(), &values).unwrap();
    assert!(markov.len() < gamma.len(), "markov {} gamma {}", markov.len(), gamma.len());
}

#[test]
fn huffman_from_histogram_approaches_entropy() {
    let mut seed = 17;
    let values = skewed(&mut seed, 4000);
    let hist = Histogram::from_values(&values);
    let weights: Vec<(u64, u64)> = hist.iter().collect();
    let code = HuffmanCode::from_weights(&weights).unwrap();

    let bits: u64 = hist.iter().map(|(v, c)| c * code.code_len(&v).unwrap() as u64).sum();
    let per_symbol = bits as f64 / hist.total() as f64;
    let h = hist.entropy_bits();
    assert!(per_symbol >= h - 1e-9 && per_symbol < h + 1.0, "{per_symbol} vs {h}");
}

#[test]
fn bleed_order_covers_every_small_integer_once() {
    let seeds = [50u64, 52, 90];
    let prefix: Vec<u64> = BleedSorted::new(seeds).take(200).collect();
    assert_eq!(&prefix[..3], &[50, 52, 90]);
    assert_eq!(prefix[3], 49);

    let mut sorted = prefix.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), prefix.len());
    // everything up to 140 lies within distance 50 of a seed
    assert!((0..=140).all(|v| prefix.contains(&v)));
}

#[test]
fn bleed_reseed_restarts() {
    let mut it = BleedSorted::new([5]);
    assert_eq!(it.by_ref().take(3).collect::<Vec<_>>(), vec![5, 4, 6]);
    it.reseed([0]);
    assert_eq!(it.take(3).collect::<Vec<_>>(), vec![0, 1, 2]);
}
