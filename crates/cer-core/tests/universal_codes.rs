// crates/cer-core/tests/universal_codes.rs

use cer_core::bits::{BitReader, BitWriter};
use cer_core::codes::iota::gamma_iota_prefix_width;
use cer_core::codes::{
    decode_seq, decode_signed, decode_unsigned_seq, encode_seq, encode_signed, encode_unsigned,
    encode_unsigned_seq, read_required, CodecId, EliasDelta, EliasGamma, Enbonacci, Unary, UniversalCode,
};
use cer_core::error::CerError;
use proptest::prelude::*;

const ALL_IDS: [u8; 14] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

fn codeword<C: UniversalCode>(code: &C, v: u64) -> Vec<u8> {
    let mut w = BitWriter::new();
    code.encode(v, &mut w).expect("encode ok");
    w.into_bits()
}

#[test]
fn elias_gamma_codewords() {
    let g = EliasGamma::new();
    assert_eq!(codeword(&g, 1), vec![1]);
    assert_eq!(codeword(&g, 4), vec![0, 0, 1, 0, 0]);
    assert_eq!(decode_seq(&g, &[0, 0, 1, 0, 0]).unwrap(), vec![4]);
}

#[test]
fn unary_sequence_codewords() {
    let bits = encode_seq(&Unary, &[3, 0, 2]).unwrap();
    assert_eq!(bits, vec![0, 0, 0, 1, 1, 0, 0, 1]);
    assert_eq!(decode_seq(&Unary, &bits).unwrap(), vec![3, 0, 2]);
}

#[test]
fn gamma_decode_leaves_the_rest_of_the_stream() {
    let g = EliasGamma::new();
    let bits = [0, 0, 1, 1, 1, 0, 0, 1];
    let mut r = BitReader::new(&bits);
    assert_eq!(g.decode(&mut r).unwrap(), Some(7));
    assert_eq!(r.remaining(), &[0, 0, 1]);
}

#[test]
fn zero_shift_adapter_emits_the_shifted_codeword() {
    for id in ALL_IDS {
        let code = CodecId::from_u8(id).unwrap().build(1000).unwrap();
        if code.zero_safe() {
            continue;
        }
        for v in [0u64, 1, 2, 9, 500, 998] {
            let mut adapted = BitWriter::new();
            encode_unsigned(&code, v, &mut adapted).unwrap();
            let mut direct = BitWriter::new();
            code.encode(v + 1, &mut direct).unwrap();
            assert_eq!(adapted.bits(), direct.bits(), "{} v={v}", code.name());
        }
    }
}

#[test]
fn elias_delta_and_unary_codewords() {
    let d = EliasDelta::new();
    assert_eq!(codeword(&d, 1), vec![1]);
    // length 3 as gamma, then the two bits below the leading one
    assert_eq!(codeword(&d, 4), vec![0, 1, 1, 0, 0]);
    assert_eq!(codeword(&Unary, 3), vec![0, 0, 0, 1]);
    assert_eq!(codeword(&Unary, 0), vec![1]);
}

#[test]
fn fibonacci_codewords() {
    let fib = Enbonacci::fibonacci();
    assert_eq!(codeword(&fib, 1), vec![1, 1]);
    assert_eq!(codeword(&fib, 4), vec![1, 0, 1, 1]);
    assert_eq!(codeword(&fib, 10), vec![0, 1, 0, 0, 1, 1]);
    assert_eq!(decode_seq(&fib, &[0, 1, 0, 0, 1, 1]).unwrap(), vec![10]);
    // 13 + 2 + 5
    assert_eq!(decode_seq(&fib, &[0, 1, 0, 1, 0, 1, 1]).unwrap(), vec![20]);
}

#[test]
fn truncated_codeword_is_a_parse_error() {
    let g = EliasGamma::new();
    let err = decode_seq(&g, &[0, 0, 1]).unwrap_err();
    assert!(matches!(err, CerError::Parse(_)), "{err:?}");

    let fib = Enbonacci::new(3).unwrap();
    assert!(matches!(decode_seq(&fib, &[0, 1, 1]), Err(CerError::Parse(_))));
}

#[test]
fn empty_stream_is_clean_end_but_required_read_is_exhausted() {
    let g = EliasGamma::new();
    assert!(decode_seq(&g, &[]).unwrap().is_empty());
    let mut r = BitReader::new(&[]);
    assert!(matches!(read_required(&g, &mut r), Err(CerError::Exhausted(_))));
}

#[test]
fn nonzero_codes_reject_raw_zero_but_adapter_accepts_it() {
    for id in ALL_IDS {
        let code = CodecId::from_u8(id).unwrap().build(1000).unwrap();
        let mut w = BitWriter::new();
        encode_unsigned(&code, 0, &mut w).expect("adapter handles zero");
        if !code.zero_safe() {
            let err = code.encode(0, &mut BitWriter::new()).unwrap_err();
            assert!(matches!(err, CerError::Domain { .. }), "{} {err:?}", code.name());
        }
        assert_eq!(decode_unsigned_seq(&code, w.bits()).unwrap(), vec![0], "{}", code.name());
    }
}

#[test]
fn iota_bound_is_enforced_both_ways() {
    let code = CodecId::EliasGammaIota.build(100).unwrap();
    assert!(matches!(
        code.encode(101, &mut BitWriter::new()),
        Err(CerError::Domain { .. })
    ));
    assert!(code.encode(100, &mut BitWriter::new()).is_ok());
    assert!(CodecId::EliasDeltaIota.build(0).is_err());
    // ⌊log₂ 100⌋ = 6 needs three bits; a power of two still fits its own prefix
    assert_eq!(gamma_iota_prefix_width(100), 3);
    assert_eq!(gamma_iota_prefix_width(64), 3);
    assert_eq!(gamma_iota_prefix_width(1), 1);
}

#[test]
fn signed_values_go_through_zigzag() {
    let g = EliasGamma::new();
    let mut w = BitWriter::new();
    for v in [0i64, -1, 1, -300, 300] {
        encode_signed(&g, v, &mut w).unwrap();
    }
    let mut r = BitReader::new(w.bits());
    let got: Vec<i64> = std::iter::from_fn(|| decode_signed(&g, &mut r).unwrap()).collect();
    assert_eq!(got, vec![0, -1, 1, -300, 300]);
}

#[test]
fn codec_ids_build_matching_names() {
    let names: Vec<&str> = ALL_IDS
        .iter()
        .map(|&id| CodecId::from_u8(id).unwrap().build(50).unwrap().name())
        .collect();
    assert_eq!(names[0], "unary");
    assert_eq!(names[1], "elias_gamma");
    assert_eq!(names[3], "fibonacci");
    assert_eq!(names[4], "tribonacci");
    assert_eq!(names[12], "elias_gamma_iota");
}

proptest! {
    #[test]
    fn unbounded_codes_roundtrip(values in prop::collection::vec(1u64..=u64::MAX / 2, 0..40)) {
        for id in [1u8, 2, 3, 5, 9, 10, 11] {
            let code = CodecId::from_u8(id).unwrap().build(1).unwrap();
            let bits = encode_seq(&code, &values).unwrap();
            prop_assert_eq!(decode_seq(&code, &bits).unwrap(), values.clone(), "{}", code.name());
        }
    }

    #[test]
    fn bounded_and_unary_codes_roundtrip(values in prop::collection::vec(0u64..500, 0..40)) {
        for id in [0u8, 12, 13] {
            let code = CodecId::from_u8(id).unwrap().build(500).unwrap();
            let bits = encode_unsigned_seq(&code, &values).unwrap();
            prop_assert_eq!(decode_unsigned_seq(&code, &bits).unwrap(), values.clone(), "{}", code.name());
        }
    }

    #[test]
    fn enbonacci_any_order(k in 2usize..=8, v in 1u64..=u64::MAX) {
        let code = Enbonacci::new(k).unwrap();
        let bits = codeword(&code, v);
        // the terminator is the only run of k ones
        prop_assert!(bits.ends_with(&vec![1u8; k]));
        prop_assert_eq!(decode_seq(&code, &bits).unwrap(), vec![v]);
    }
}
