// crates/cer-core/src/transform/zigzag.rs
//
// NOP = "negative or positive" (signed), OP = "only positive" (unsigned).

/// n >= 0 ↦ 2n, n < 0 ↦ -2n - 1.
#[inline]
pub fn nop_to_op(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub fn op_to_nop(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Fold values near `focus` onto small outputs: `v <= 2f` maps to
/// `zigzag(v - f)`, larger values pass through unchanged. Injective for
/// `f < 2^63`.
#[inline]
pub fn focus(v: u64, focus: u64) -> u64 {
    if (v as u128) <= 2 * focus as u128 {
        nop_to_op((v as i64).wrapping_sub(focus as i64))
    } else {
        v
    }
}

/// Inverse of [`focus`] for the same focus value. `None` when the coded
/// value would unfold outside `[0, i64::MAX]`.
#[inline]
pub fn unfocus(u: u64, focus: u64) -> Option<u64> {
    if (u as u128) <= 2 * focus as u128 {
        i64::try_from(focus)
            .ok()?
            .checked_add(op_to_nop(u))
            .and_then(|v| u64::try_from(v).ok())
    } else {
        Some(u)
    }
}

pub fn nop_to_op_seq(values: &[i64]) -> Vec<u64> {
    values.iter().map(|&v| nop_to_op(v)).collect()
}

pub fn op_to_nop_seq(values: &[u64]) -> Vec<i64> {
    values.iter().map(|&v| op_to_nop(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_small_values() {
        let signed = [0i64, -1, 1, -2, 2, i64::MIN, i64::MAX];
        let unsigned = nop_to_op_seq(&signed);
        assert_eq!(&unsigned[..5], &[0, 1, 2, 3, 4]);
        assert_eq!(op_to_nop_seq(&unsigned), signed.to_vec());
    }

    #[test]
    fn unfocus_rejects_values_that_unfold_past_i64() {
        let f = i64::MAX as u64;
        assert_eq!(unfocus(u64::MAX - 1, f), None);
        assert_eq!(unfocus(focus(7, f), f), Some(7));
        assert_eq!(unfocus(1, 0), Some(1));
    }
}
