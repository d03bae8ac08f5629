// crates/cer-core/src/post/markov.rs
//
// Adaptive order-k Markov coder. Each value is coded with a Huffman code
// built from the counts seen so far after the same k preceding values. A
// value new to its context is sent as an escape followed by its rank in the
// bleed-sorted order of every value seen so far, under a universal code.
//
// Encoder and decoder update the model identically, so no table is sent.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::bits::{BitReader, BitWriter};
use crate::codes::{decode_unsigned, encode_unsigned, UniversalCode};
use crate::error::{CerError, Result};
use crate::post::bleed::BleedSorted;
use crate::post::histogram::Histogram;
use crate::post::huffman::HuffmanCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Escape,
    Value(u64),
}

#[derive(Clone, Debug, Default)]
struct Model {
    order: usize,
    contexts: HashMap<Vec<u64>, Histogram>,
    history: VecDeque<u64>,
    seen: BTreeSet<u64>,
}

impl Model {
    fn new(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    fn context(&self) -> Vec<u64> {
        self.history.iter().copied().collect()
    }

    /// Escape weighs as much as the number of distinct values in the context.
    fn code(&self, ctx: &[u64]) -> Result<HuffmanCode<Symbol>> {
        let mut weights = Vec::new();
        match self.contexts.get(ctx) {
            Some(h) => {
                weights.push((Symbol::Escape, h.distinct() as u64));
                weights.extend(h.iter().map(|(v, c)| (Symbol::Value(v), c)));
            }
            None => weights.push((Symbol::Escape, 1)),
        }
        HuffmanCode::from_weights(&weights)
    }

    fn seeds(&self) -> Vec<u64> {
        self.seen.iter().copied().collect()
    }

    fn update(&mut self, ctx: Vec<u64>, v: u64) {
        self.contexts.entry(ctx).or_default().add(v);
        self.seen.insert(v);
        if self.order > 0 {
            self.history.push_back(v);
            if self.history.len() > self.order {
                self.history.pop_front();
            }
        }
    }
}

pub struct MarkovCodec<C> {
    order: usize,
    novelty: C,
}

impl<C: UniversalCode> MarkovCodec<C> {
    pub fn new(order: usize, novelty: C) -> Self {
        Self { order, novelty }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn encode_into(&self, values: &[u64], out: &mut BitWriter) -> Result<()> {
        let mut model = Model::new(self.order);
        for &v in values {
            let ctx = model.context();
            let code = model.code(&ctx)?;
            let sym = Symbol::Value(v);
            if code.code_len(&sym).is_some() {
                code.encode(&sym, out)?;
            } else {
                code.encode(&Symbol::Escape, out)?;
                let rank = BleedSorted::rank_of(&model.seeds(), v);
                encode_unsigned(&self.novelty, rank, out)?;
            }
            model.update(ctx, v);
        }
        Ok(())
    }

    pub fn encode_seq(&self, values: &[u64]) -> Result<Vec<u8>> {
        let mut out = BitWriter::new();
        self.encode_into(values, &mut out)?;
        Ok(out.into_bits())
    }

    /// Decode until the stream ends on a symbol boundary.
    pub fn decode_from(&self, input: &mut BitReader<'_>) -> Result<Vec<u64>> {
        let mut model = Model::new(self.order);
        let mut out = Vec::new();
        loop {
            let ctx = model.context();
            let code = model.code(&ctx)?;
            let v = match code.decode(input)? {
                None => break,
                Some(Symbol::Value(v)) => v,
                Some(Symbol::Escape) => match decode_unsigned(&self.novelty, input)? {
                    Some(rank) => BleedSorted::nth_of(&model.seeds(), rank)
                        .ok_or_else(|| CerError::parse(format!("markov: novelty rank {rank} out of range")))?,
                    // a context with no history spends no bits on the escape
                    None if code.code_len(&Symbol::Escape) == Some(0) => break,
                    None => return Err(CerError::parse("markov: stream ended after an escape")),
                },
            };
            out.push(v);
            model.update(ctx, v);
        }
        Ok(out)
    }

    pub fn decode_seq(&self, bits: &[u8]) -> Result<Vec<u64>> {
        self.decode_from(&mut BitReader::new(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::EliasGamma;

    #[test]
    fn repeated_context_gets_cheap() {
        let codec = MarkovCodec::new(1, EliasGamma::new());
        let values: Vec<u64> = [0u64, 5].iter().copied().cycle().take(200).collect();
        let bits = codec.encode_seq(&values).unwrap();
        // after warm-up each context holds one value plus escape: one bit each
        assert!(bits.len() < 220, "{}", bits.len());
        assert_eq!(codec.decode_seq(&bits).unwrap(), values);
    }

    #[test]
    fn empty_sequence() {
        let codec = MarkovCodec::new(2, EliasGamma::new());
        assert!(codec.encode_seq(&[]).unwrap().is_empty());
        assert!(codec.decode_seq(&[]).unwrap().is_empty());
    }
}
