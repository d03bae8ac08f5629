// crates/cer-core/src/transform/delta.rs

/// y[i] = x[i] - x[i-1], with x[-1] = 0. Wrapping, so every input round-trips.
pub fn delta_encode(values: &[i64]) -> Vec<i64> {
    let mut prev = 0i64;
    values
        .iter()
        .map(|&v| {
            let d = v.wrapping_sub(prev);
            prev = v;
            d
        })
        .collect()
}

pub fn delta_decode(deltas: &[i64]) -> Vec<i64> {
    let mut acc = 0i64;
    deltas
        .iter()
        .map(|&d| {
            acc = acc.wrapping_add(d);
            acc
        })
        .collect()
}

/// Unsigned convenience: deltas of a non-negative sequence, zig-zag folded.
pub fn delta_encode_unsigned(values: &[u64]) -> Vec<u64> {
    let signed: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    super::zigzag::nop_to_op_seq(&delta_encode(&signed))
}

pub fn delta_decode_unsigned(coded: &[u64]) -> Vec<u64> {
    delta_decode(&super::zigzag::op_to_nop_seq(coded))
        .into_iter()
        .map(|v| v as u64)
        .collect()
}
