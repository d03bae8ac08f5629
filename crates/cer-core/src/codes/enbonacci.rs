// crates/cer-core/src/codes/enbonacci.rs
//
// Enbonacci (generalized Fibonacci) coding of order k >= 2.
//
// A codeword is `u ++ 1^k` where the body `u` has no run of k ones and is
// either empty or ends in 0. The decoder therefore stops at the first run of
// k ones. Bodies are ordered by length, then by value with bit 0 least
// significant:
//
//   value(u) = base[m] + Σ_{u_i = 1} place[i]          m = len(u)
//
// `place[i]` counts the binary strings of length i without k consecutive
// ones; it is the order-k enbonacci sequence (k-1 zeros, a one, each term the
// sum of the previous k) with its leading terms dropped. `base[m]` is one plus
// the number of codewords with a shorter body, i.e. a running total of places.
// For k = 2 this is classical Zeckendorf coding: 1 → 11, 4 → 1011.

use crate::bits::{BitReader, BitWriter};
use crate::codes::{require_nonzero, Domain, UniversalCode};
use crate::error::{CerError, Result};

pub const MAX_ORDER: usize = 32;

#[derive(Clone, Debug)]
pub struct Enbonacci {
    order: usize,
    place: Vec<u128>,
    /// base[m] for every m whose base fits in u64; the table ends one past the
    /// last representable body length.
    base: Vec<u128>,
}

impl Enbonacci {
    pub fn new(order: usize) -> Result<Self> {
        if !(2..=MAX_ORDER).contains(&order) {
            return Err(CerError::validation(format!(
                "enbonacci order must be in 2..={MAX_ORDER}, got {order}"
            )));
        }
        Ok(Self::build(order))
    }

    pub fn fibonacci() -> Self {
        Self::build(2)
    }

    fn build(order: usize) -> Self {
        let limit = u64::MAX as u128 + 1;

        let mut place: Vec<u128> = Vec::new();
        let mut base: Vec<u128> = vec![1];
        loop {
            let m = base.len();
            // codewords with body length m-1: 1 for the empty body, else place[m-2]
            let count = if m == 1 { 1 } else { place[m - 2] };
            let next = base[m - 1] + count;

            let i = place.len();
            let p = if i < order {
                1u128 << i
            } else {
                place[i - order..].iter().sum()
            };
            place.push(p);

            base.push(next);
            if next >= limit {
                break;
            }
        }

        Self { order, place, base }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Place value of body bit `i`.
    pub fn place(&self, i: usize) -> Option<u64> {
        self.place.get(i).map(|&p| p as u64)
    }

    /// Body bits for `value` (excludes the terminator).
    fn body_for(&self, value: u64) -> Vec<u8> {
        let v = value as u128;
        // largest m with base[m] <= v; base[0] = 1 <= v
        let m = self.base.partition_point(|&b| b <= v) - 1;
        let mut r = v - self.base[m];

        let mut body = vec![0u8; m];
        if m >= 2 {
            for i in (0..m - 1).rev() {
                if self.place[i] <= r {
                    body[i] = 1;
                    r -= self.place[i];
                }
            }
        }
        debug_assert_eq!(r, 0);
        body
    }
}

impl UniversalCode for Enbonacci {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "fibonacci",
            3 => "tribonacci",
            4 => "tetranacci",
            5 => "pentanacci",
            6 => "hexanacci",
            7 => "heptanacci",
            8 => "octanacci",
            _ => "enbonacci",
        }
    }

    fn domain(&self) -> Domain {
        Domain::UnsignedNonzero
    }

    fn encode(&self, value: u64, out: &mut BitWriter) -> Result<()> {
        require_nonzero(self.name(), value)?;
        out.extend_from_bits(&self.body_for(value));
        out.push_run(true, self.order);
        Ok(())
    }

    fn decode(&self, input: &mut BitReader<'_>) -> Result<Option<u64>> {
        let mut bits: Vec<u8> = Vec::new();
        let mut ones = 0usize;

        while ones < self.order {
            match input.read_bit() {
                Some(true) => {
                    ones += 1;
                    bits.push(1);
                }
                Some(false) => {
                    ones = 0;
                    bits.push(0);
                }
                None if bits.is_empty() => return Ok(None),
                None => {
                    return Err(CerError::parse(format!(
                        "{}: stream ended inside a codeword after {} bits",
                        self.name(),
                        bits.len()
                    )))
                }
            }
        }

        let m = bits.len() - self.order;
        if m + 1 >= self.base.len() {
            return Err(CerError::parse(format!("{}: codeword too long ({} bits)", self.name(), bits.len())));
        }

        let mut v = self.base[m];
        for (i, &b) in bits[..m].iter().enumerate() {
            if b == 1 {
                v += self.place[i];
            }
        }
        if v > u64::MAX as u128 {
            return Err(CerError::parse(format!("{}: value overflows u64", self.name())));
        }
        Ok(Some(v as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_follow_the_enbonacci_recurrence() {
        let fib = Enbonacci::new(2).unwrap();
        let p: Vec<u64> = (0..8).map(|i| fib.place(i).unwrap()).collect();
        assert_eq!(p, vec![1, 2, 3, 5, 8, 13, 21, 34]);

        let trib = Enbonacci::new(3).unwrap();
        let p: Vec<u64> = (0..8).map(|i| trib.place(i).unwrap()).collect();
        assert_eq!(p, vec![1, 2, 4, 7, 13, 24, 44, 81]);
    }

    #[test]
    fn bodies_never_contain_the_terminator() {
        for k in 2..=5 {
            let code = Enbonacci::new(k).unwrap();
            for v in 1..2000u64 {
                let body = code.body_for(v);
                let mut run = 0;
                for &b in &body {
                    run = if b == 1 { run + 1 } else { 0 };
                    assert!(run < k, "k={k} v={v} body={body:?}");
                }
                assert!(body.last().map_or(true, |&b| b == 0), "k={k} v={v}");
            }
        }
    }

    #[test]
    fn max_value_roundtrips() {
        for k in 2..=8 {
            let code = Enbonacci::new(k).unwrap();
            let mut w = BitWriter::new();
            code.encode(u64::MAX, &mut w).unwrap();
            let mut r = BitReader::new(w.bits());
            assert_eq!(code.decode(&mut r).unwrap(), Some(u64::MAX));
        }
    }
}
