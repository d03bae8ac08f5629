// crates/cer-core/src/post/bleed.rs
//
// Bleed-sorted order: the seed values ascending, then every other
// non-negative integer by distance to its nearest seed, smaller value first
// on ties. With no seeds the order is simply 0, 1, 2, ...

use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Down,
    Up,
}

#[derive(Clone, Debug)]
pub struct BleedSorted {
    seeds: Vec<u64>,
    next_seed: usize,
    /// (seed index, direction) still producing values.
    active: Vec<(usize, Dir)>,
    distance: u64,
    pending: VecDeque<u64>,
    /// Counter used when there are no seeds.
    plain: Option<u64>,
}

impl BleedSorted {
    pub fn new<I: IntoIterator<Item = u64>>(seeds: I) -> Self {
        let mut seeds: Vec<u64> = seeds.into_iter().collect();
        seeds.sort_unstable();
        seeds.dedup();
        let active = (0..seeds.len()).flat_map(|i| [(i, Dir::Down), (i, Dir::Up)]).collect();
        let plain = seeds.is_empty().then_some(0);
        Self {
            seeds,
            next_seed: 0,
            active,
            distance: 0,
            pending: VecDeque::new(),
            plain,
        }
    }

    /// Start over from a new seed set.
    pub fn reseed<I: IntoIterator<Item = u64>>(&mut self, seeds: I) {
        *self = Self::new(seeds);
    }

    /// Candidate at `d` from seed `i` going `dir`, or None once that side is
    /// closer to a neighbouring seed (or off the integer range).
    fn candidate(&self, i: usize, dir: Dir, d: u64) -> Option<u64> {
        let s = self.seeds[i];
        match dir {
            Dir::Down => {
                let c = s.checked_sub(d)?;
                match i.checked_sub(1).map(|j| self.seeds[j]) {
                    Some(prev) if c <= prev => None,
                    Some(prev) if c - prev < d => None,
                    _ => Some(c),
                }
            }
            Dir::Up => {
                let c = s.checked_add(d)?;
                match self.seeds.get(i + 1) {
                    Some(&next) if next <= c => None,
                    // equidistant values are produced from below
                    Some(&next) if next - c <= d => None,
                    _ => Some(c),
                }
            }
        }
    }

    fn refill(&mut self) {
        while self.pending.is_empty() && !self.active.is_empty() {
            self.distance += 1;
            let d = self.distance;
            let mut batch = Vec::with_capacity(self.active.len());
            let mut keep = Vec::with_capacity(self.active.len());
            for &(i, dir) in &self.active {
                if let Some(c) = self.candidate(i, dir, d) {
                    batch.push(c);
                    keep.push((i, dir));
                }
            }
            self.active = keep;
            batch.sort_unstable();
            batch.dedup();
            self.pending.extend(batch);
        }
    }

    /// Position of `value` in the order.
    pub fn rank_of(seeds: &[u64], value: u64) -> u64 {
        let mut rank = 0u64;
        for v in BleedSorted::new(seeds.iter().copied()) {
            if v == value {
                return rank;
            }
            rank += 1;
        }
        rank
    }

    pub fn nth_of(seeds: &[u64], n: u64) -> Option<u64> {
        let mut it = BleedSorted::new(seeds.iter().copied());
        let mut v = it.next();
        for _ in 0..n {
            v = it.next();
        }
        v
    }
}

impl Iterator for BleedSorted {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if let Some(n) = self.plain.as_mut() {
            let v = *n;
            *n = n.checked_add(1)?;
            return Some(v);
        }
        if self.next_seed < self.seeds.len() {
            self.next_seed += 1;
            return Some(self.seeds[self.next_seed - 1]);
        }
        self.refill();
        self.pending.pop_front()
    }
}
