// crates/cer-core/src/catalogue/limits.rs
//
// Column tracked by two exclusive limits: cells in (lo, hi) are unknown, the
// rest eliminated. Only the cells adjacent to a limit may be eliminated, which
// is all CER ever asks for.

use crate::catalogue::{CellStatus, ColumnCatalogue};
use crate::error::{CerError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimitsColumn {
    lo: i64,
    hi: i64,
    resolved: Option<u32>,
}

impl ColumnCatalogue for LimitsColumn {
    fn new(value_range: u32) -> Self {
        Self {
            lo: -1,
            hi: value_range as i64,
            resolved: None,
        }
    }

    fn unknown_count(&self) -> u32 {
        if self.resolved.is_some() {
            return 0;
        }
        (self.hi - self.lo - 1).max(0) as u32
    }

    fn status(&self, y: u32) -> CellStatus {
        if self.resolved == Some(y) {
            return CellStatus::Live;
        }
        let y = y as i64;
        if self.resolved.is_none() && self.lo < y && y < self.hi {
            CellStatus::Unknown
        } else {
            CellStatus::Eliminated
        }
    }

    fn eliminate(&mut self, y: u32) -> Result<bool> {
        if self.resolved.is_some() {
            return Err(CerError::integrity(format!("eliminate {y} in a resolved column")));
        }
        let y = y as i64;
        if y == self.lo + 1 && y < self.hi {
            self.lo = y;
        } else if y == self.hi - 1 && y > self.lo {
            self.hi = y;
        } else {
            return Err(CerError::integrity(format!(
                "cell {y} is not at a limit of ({}, {})",
                self.lo, self.hi
            )));
        }
        Ok(self.unknown_count() == 1)
    }

    fn resolve(&mut self, value: u32) -> Result<()> {
        if let Some(prev) = self.resolved {
            if prev != value {
                return Err(CerError::integrity(format!("column resolved to {prev}, then {value}")));
            }
        }
        let v = value as i64;
        if !(self.lo < v && v < self.hi) {
            return Err(CerError::integrity(format!(
                "resolve to eliminated cell {value} (limits {}, {})",
                self.lo, self.hi
            )));
        }
        self.lo = v - 1;
        self.hi = v + 1;
        self.resolved = Some(value);
        Ok(())
    }

    fn resolved(&self) -> Option<u32> {
        self.resolved
    }

    fn extremes(&self) -> Option<(u32, u32)> {
        (self.unknown_count() > 0).then(|| ((self.lo + 1) as u32, (self.hi - 1) as u32))
    }

    fn would_impose(&self, min: Option<u32>, max: Option<u32>) -> (i64, i64) {
        let lo = min.map_or(self.lo, |m| self.lo.max(m as i64 - 1));
        let hi = max.map_or(self.hi, |m| self.hi.min(m as i64 + 1));
        (lo, hi)
    }

    fn impose(&mut self, min: Option<u32>, max: Option<u32>) -> u32 {
        let before = self.unknown_count();
        let (lo, hi) = self.would_impose(min, max);
        self.lo = lo;
        self.hi = hi;
        before - self.unknown_count()
    }
}
