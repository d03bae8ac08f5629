// crates/cer-core/src/transform/heading.rs
//
// Heading transforms emit a small header followed by the re-expressed values.
// The header is part of the output sequence so any universal code can carry it.

use crate::error::{CerError, Result};
use crate::transform::zigzag::{nop_to_op, op_to_nop};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    /// `[len, palette deltas.., indices..]` over the sorted distinct values.
    Palette,
    /// `[min, v - min..]`
    Floor,
    /// `[median, zigzag(v - median)..]`, lower median for even lengths.
    Median,
}

pub fn heading_encode(kind: Heading, values: &[u64]) -> Vec<u64> {
    match kind {
        Heading::Palette => palette_encode(values),
        Heading::Floor => {
            let floor = values.iter().copied().min().unwrap_or(0);
            std::iter::once(floor).chain(values.iter().map(|&v| v - floor)).collect()
        }
        Heading::Median => {
            let median = lower_median(values);
            std::iter::once(median)
                .chain(values.iter().map(|&v| nop_to_op(v.wrapping_sub(median) as i64)))
                .collect()
        }
    }
}

pub fn heading_decode(kind: Heading, data: &[u64]) -> Result<Vec<u64>> {
    let Some((&head, rest)) = data.split_first() else {
        return Err(CerError::Exhausted(format!("{kind:?} heading: missing header")));
    };
    match kind {
        Heading::Palette => palette_decode(head, rest),
        Heading::Floor => rest
            .iter()
            .map(|&v| {
                v.checked_add(head)
                    .ok_or_else(|| CerError::parse(format!("floor heading: {v} + {head} overflows")))
            })
            .collect(),
        Heading::Median => Ok(rest
            .iter()
            .map(|&v| head.wrapping_add(op_to_nop(v) as u64))
            .collect()),
    }
}

fn lower_median(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[(sorted.len() - 1) / 2]
}

fn palette_encode(values: &[u64]) -> Vec<u64> {
    let mut palette = values.to_vec();
    palette.sort_unstable();
    palette.dedup();

    let mut out = Vec::with_capacity(1 + palette.len() + values.len());
    out.push(palette.len() as u64);
    let mut prev = 0u64;
    for &p in &palette {
        out.push(p - prev);
        prev = p;
    }
    for v in values {
        // present by construction
        let idx = palette.binary_search(v).unwrap_or_default();
        out.push(idx as u64);
    }
    out
}

fn palette_decode(len: u64, rest: &[u64]) -> Result<Vec<u64>> {
    let len = usize::try_from(len).map_err(|_| CerError::parse("palette length overflows"))?;
    if rest.len() < len {
        return Err(CerError::parse(format!(
            "palette heading: header promises {len} entries, {} values follow",
            rest.len()
        )));
    }
    let (deltas, indices) = rest.split_at(len);

    let mut palette = Vec::with_capacity(len);
    let mut acc = 0u64;
    for &d in deltas {
        acc = acc
            .checked_add(d)
            .ok_or_else(|| CerError::parse("palette heading: entry overflows"))?;
        palette.push(acc);
    }

    indices
        .iter()
        .map(|&i| {
            palette
                .get(i as usize)
                .copied()
                .ok_or_else(|| CerError::parse(format!("palette heading: index {i} out of {len}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_layout() {
        let coded = heading_encode(Heading::Palette, &[40, 7, 40, 12]);
        assert_eq!(coded, vec![3, 7, 5, 28, 2, 0, 2, 1]);
        assert_eq!(heading_decode(Heading::Palette, &coded).unwrap(), vec![40, 7, 40, 12]);
    }

    #[test]
    fn floor_and_median_headers() {
        assert_eq!(heading_encode(Heading::Floor, &[9, 5, 7]), vec![5, 4, 0, 2]);
        assert_eq!(heading_encode(Heading::Median, &[9, 5, 7, 6]), vec![6, 6, 1, 2, 0]);
        assert_eq!(heading_encode(Heading::Floor, &[]), vec![0]);
        assert!(heading_decode(Heading::Floor, &[]).is_err());
    }
}
