// crates/cer-core/src/cer/rankings.rs
//
// Ordered set of frontier cells. Each unresolved column contributes at most
// two entries, its lowest and highest unknown cell. Ties on score break by
// column, then by cell, so both codec directions pop in the same order.

use std::collections::BTreeSet;

use crate::cer::scoring::Score;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankedCell {
    pub score: Score,
    pub x: usize,
    pub y: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

impl Side {
    fn slot(self) -> usize {
        match self {
            Side::Low => 0,
            Side::High => 1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rankings {
    set: BTreeSet<RankedCell>,
    slots: Vec<[Option<RankedCell>; 2]>,
    peak: usize,
}

impl Rankings {
    pub fn new(len: usize) -> Self {
        Self {
            set: BTreeSet::new(),
            slots: vec![[None, None]; len],
            peak: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Insert or replace the entry for one side of a column.
    pub fn insert(&mut self, side: Side, cell: RankedCell) {
        let slot = &mut self.slots[cell.x][side.slot()];
        if let Some(old) = slot.replace(cell) {
            self.set.remove(&old);
        }
        self.set.insert(cell);
        self.peak = self.peak.max(self.set.len());
    }

    pub fn remove_column(&mut self, x: usize) {
        for slot in &mut self.slots[x] {
            if let Some(old) = slot.take() {
                self.set.remove(&old);
            }
        }
    }

    pub fn entry(&self, x: usize, side: Side) -> Option<RankedCell> {
        self.slots[x][side.slot()]
    }

    /// Remove and return the lowest-scored cell with the side it stood for.
    pub fn pop_lowest(&mut self) -> Option<(RankedCell, Side)> {
        let cell = self.set.pop_first()?;
        let slots = &mut self.slots[cell.x];
        let side = if slots[0] == Some(cell) { Side::Low } else { Side::High };
        slots[side.slot()] = None;
        Some((cell, side))
    }
}
