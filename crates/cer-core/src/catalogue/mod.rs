// crates/cer-core/src/catalogue/mod.rs
//
// Cell catalogue: for each of N columns, which of the V cells are still
// possible values. A column is resolved once its value is known.

pub mod grid;
pub mod limits;

use crate::error::{CerError, Result};

pub use grid::GridColumn;
pub use limits::LimitsColumn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellStatus {
    Unknown,
    Eliminated,
    /// The resolved value of its column.
    Live,
}

/// Per-column bookkeeping. Resolved columns report zero unknown cells.
pub trait ColumnCatalogue: Clone {
    fn new(value_range: u32) -> Self;

    fn unknown_count(&self) -> u32;

    fn status(&self, y: u32) -> CellStatus;

    /// Eliminate an unknown cell. Returns true when exactly one unknown cell
    /// remains (the column is critical).
    fn eliminate(&mut self, y: u32) -> Result<bool>;

    fn resolve(&mut self, value: u32) -> Result<()>;

    fn resolved(&self) -> Option<u32>;

    /// Lowest and highest unknown cell.
    fn extremes(&self) -> Option<(u32, u32)>;

    /// Exclusive limits the column would have after imposing a range.
    fn would_impose(&self, min: Option<u32>, max: Option<u32>) -> (i64, i64);

    /// Eliminate every cell outside the range; returns how many were removed.
    fn impose(&mut self, min: Option<u32>, max: Option<u32>) -> u32;
}

/// Which extremes of each unresolved column to yield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sides {
    pub low: bool,
    pub high: bool,
}

impl Sides {
    pub const BOTH: Sides = Sides { low: true, high: true };
}

#[derive(Clone, Debug)]
pub struct CellCatalogue<C: ColumnCatalogue = LimitsColumn> {
    value_range: u32,
    columns: Vec<C>,
    eliminations: u64,
}

impl<C: ColumnCatalogue> CellCatalogue<C> {
    pub fn new(len: usize, value_range: u32) -> Self {
        Self {
            value_range,
            columns: vec![C::new(value_range); len],
            eliminations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn value_range(&self) -> u32 {
        self.value_range
    }

    /// Cells eliminated one at a time or by an imposed range.
    pub fn eliminations(&self) -> u64 {
        self.eliminations
    }

    pub fn column(&self, x: usize) -> &C {
        &self.columns[x]
    }

    pub fn unknown_count(&self, x: usize) -> u32 {
        self.columns[x].unknown_count()
    }

    pub fn total_unknown(&self) -> u64 {
        self.columns.iter().map(|c| c.unknown_count() as u64).sum()
    }

    pub fn status(&self, x: usize, y: u32) -> CellStatus {
        self.columns[x].status(y)
    }

    pub fn resolved(&self, x: usize) -> Option<u32> {
        self.columns[x].resolved()
    }

    pub fn is_resolved(&self, x: usize) -> bool {
        self.columns[x].resolved().is_some()
    }

    /// The single remaining unknown cell of a critical column.
    pub fn critical_value(&self, x: usize) -> Option<u32> {
        let c = &self.columns[x];
        match (c.unknown_count(), c.extremes()) {
            (1, Some((y, _))) => Some(y),
            _ => None,
        }
    }

    pub fn eliminate(&mut self, x: usize, y: u32) -> Result<bool> {
        let critical = self.columns[x].eliminate(y)?;
        self.eliminations += 1;
        Ok(critical)
    }

    /// Resolve column `x` to `value`.
    pub fn eliminate_column(&mut self, x: usize, value: u32) -> Result<()> {
        if value >= self.value_range {
            return Err(CerError::integrity(format!("value {value} outside range {}", self.value_range)));
        }
        self.columns[x].resolve(value)
    }

    pub fn impose_minimum(&mut self, min: u32) -> Result<u64> {
        self.impose(Some(min), None)
    }

    pub fn impose_maximum(&mut self, max: u32) -> Result<u64> {
        self.impose(None, Some(max))
    }

    /// Restrict every unresolved column to [min, max]. Every column must keep
    /// more than three unknown cells (hi - lo > 4); otherwise nothing changes.
    pub fn impose(&mut self, min: Option<u32>, max: Option<u32>) -> Result<u64> {
        for (x, c) in self.columns.iter().enumerate() {
            if c.resolved().is_some() {
                continue;
            }
            let (lo, hi) = c.would_impose(min, max);
            if hi - lo <= 4 {
                return Err(CerError::validation(format!(
                    "imposing [{min:?}, {max:?}] leaves column {x} with limits ({lo}, {hi})"
                )));
            }
        }
        let mut removed = 0u64;
        for c in self.columns.iter_mut().filter(|c| c.resolved().is_none()) {
            removed += c.impose(min, max) as u64;
        }
        self.eliminations += removed;
        Ok(removed)
    }

    /// Lowest/highest unknown cell of every unresolved column, in column
    /// order. A column with a single unknown cell yields it once.
    pub fn extreme_unknown_cells(&self, sides: Sides) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.columns.iter().enumerate().flat_map(move |(x, c)| {
            let (low, high) = match c.extremes() {
                Some((lo, hi)) => (
                    sides.low.then_some((x, lo)),
                    (sides.high && !(sides.low && lo == hi)).then_some((x, hi)),
                ),
                None => (None, None),
            };
            low.into_iter().chain(high)
        })
    }

    /// Snap `y` into the unknown interval of column `x`.
    pub fn clamp(&self, x: usize, y: i64) -> Result<u32> {
        let (lo, hi) = match (self.columns[x].resolved(), self.columns[x].extremes()) {
            (Some(v), _) => (v, v),
            (None, Some(e)) => e,
            (None, None) => return Err(CerError::integrity(format!("column {x} has no unknown cells"))),
        };
        if y < lo as i64 {
            Ok(lo)
        } else if y > hi as i64 {
            Ok(hi)
        } else {
            Err(CerError::NoChange)
        }
    }
}
