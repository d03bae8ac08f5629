// crates/cer-core/src/post/huffman.rs
//
// Canonical Huffman codes over any ordered symbol type. Construction is fully
// deterministic (ties break on creation order) so an encoder and a decoder
// that see the same weights build the same code.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use crate::bits::{BitReader, BitWriter};
use crate::error::{CerError, Result};

pub const MAX_CODE_LEN: u32 = 63;

#[derive(Clone, Debug)]
pub struct HuffmanCode<S: Ord + Copy> {
    codes: BTreeMap<S, (u64, u32)>,
    lookup: HashMap<(u32, u64), S>,
    max_len: u32,
}

/// Code length per symbol; `weights` must be sorted by symbol.
fn code_lengths(weights: &[u64]) -> Vec<u32> {
    let n = weights.len();
    if n == 1 {
        return vec![0];
    }
    // node ids: 0..n leaves, then internal nodes in creation order
    let mut parent: Vec<usize> = vec![usize::MAX; n];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> =
        weights.iter().enumerate().map(|(i, &w)| Reverse((w, i))).collect();

    while heap.len() > 1 {
        let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let id = parent.len();
        parent.push(usize::MAX);
        parent[a] = id;
        parent[b] = id;
        heap.push(Reverse((wa.saturating_add(wb), id)));
    }

    (0..n)
        .map(|leaf| {
            let mut depth = 0;
            let mut node = leaf;
            while parent[node] != usize::MAX {
                node = parent[node];
                depth += 1;
            }
            depth
        })
        .collect()
}

impl<S: Ord + Copy + std::hash::Hash> HuffmanCode<S> {
    /// Build from `(symbol, weight)` pairs. Zero weights are treated as one.
    pub fn from_weights(weights: &[(S, u64)]) -> Result<Self> {
        if weights.is_empty() {
            return Err(CerError::validation("huffman code needs at least one symbol"));
        }
        let mut sorted: Vec<(S, u64)> = weights.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.dedup_by(|a, b| a.0 == b.0);

        let lens = code_lengths(&sorted.iter().map(|&(_, w)| w.max(1)).collect::<Vec<_>>());
        let max_len = lens.iter().copied().max().unwrap_or(0);
        if max_len > MAX_CODE_LEN {
            return Err(CerError::validation(format!("huffman code length {max_len} too long")));
        }

        // canonical assignment: by (length, symbol)
        let mut order: Vec<(u32, S)> = lens.iter().zip(&sorted).map(|(&l, &(s, _))| (l, s)).collect();
        order.sort();

        let mut codes = BTreeMap::new();
        let mut lookup = HashMap::new();
        let mut code = 0u64;
        let mut prev_len = order.first().map_or(0, |&(l, _)| l);
        for (i, &(len, sym)) in order.iter().enumerate() {
            if i > 0 {
                code = (code + 1) << (len - prev_len);
            }
            prev_len = len;
            codes.insert(sym, (code, len));
            lookup.insert((len, code), sym);
        }

        Ok(Self { codes, lookup, max_len })
    }

    pub fn code_len(&self, sym: &S) -> Option<u32> {
        self.codes.get(sym).map(|&(_, l)| l)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &S> {
        self.codes.keys()
    }

    pub fn encode(&self, sym: &S, out: &mut BitWriter) -> Result<()> {
        let &(code, len) = self
            .codes
            .get(sym)
            .ok_or_else(|| CerError::validation("symbol not in huffman code"))?;
        out.push_bits(code, len);
        Ok(())
    }

    /// `Ok(None)` at a clean end of stream. A single-symbol code spends no
    /// bits and always decodes.
    pub fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<S>> {
        if self.max_len == 0 {
            return Ok(self.codes.keys().next().copied());
        }
        let mut code = 0u64;
        for len in 1..=self.max_len {
            match input.read_bit() {
                Some(b) => code = (code << 1) | b as u64,
                None if len == 1 => return Ok(None),
                None => return Err(CerError::parse("stream ended inside a huffman code")),
            }
            if let Some(&s) = self.lookup.get(&(len, code)) {
                return Ok(Some(s));
            }
        }
        Err(CerError::parse("invalid huffman code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_lengths_follow_weights() {
        let code = HuffmanCode::from_weights(&[('a', 8), ('b', 4), ('c', 2), ('d', 2)]).unwrap();
        assert_eq!(code.code_len(&'a'), Some(1));
        assert_eq!(code.code_len(&'b'), Some(2));
        assert_eq!(code.code_len(&'c'), Some(3));
        assert_eq!(code.code_len(&'d'), Some(3));

        let mut w = BitWriter::new();
        for s in ['a', 'b', 'c', 'd'] {
            code.encode(&s, &mut w).unwrap();
        }
        assert_eq!(w.bits(), &[0, 1, 0, 1, 1, 0, 1, 1, 1]);

        let mut r = BitReader::new(w.bits());
        let decoded: Vec<char> = std::iter::from_fn(|| code.decode(&mut r).unwrap()).collect();
        assert_eq!(decoded, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn single_symbol_costs_nothing() {
        let code = HuffmanCode::from_weights(&[(7u64, 3)]).unwrap();
        let mut w = BitWriter::new();
        code.encode(&7, &mut w).unwrap();
        assert!(w.is_empty());
        assert_eq!(code.decode(&mut BitReader::new(&[])).unwrap(), Some(7));
    }
}
