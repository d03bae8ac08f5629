// crates/cer-core/src/catalogue/grid.rs
//
// Column tracked cell by cell. Any unknown cell may be eliminated; extremes
// are found by scanning.

use crate::catalogue::{CellStatus, ColumnCatalogue};
use crate::error::{CerError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridColumn {
    cells: Vec<CellStatus>,
    unknown: u32,
}

impl GridColumn {
    fn lowest_unknown(&self) -> Option<usize> {
        self.cells.iter().position(|&c| c == CellStatus::Unknown)
    }

    fn highest_unknown(&self) -> Option<usize> {
        self.cells.iter().rposition(|&c| c == CellStatus::Unknown)
    }
}

impl ColumnCatalogue for GridColumn {
    fn new(value_range: u32) -> Self {
        Self {
            cells: vec![CellStatus::Unknown; value_range as usize],
            unknown: value_range,
        }
    }

    fn unknown_count(&self) -> u32 {
        self.unknown
    }

    fn status(&self, y: u32) -> CellStatus {
        self.cells.get(y as usize).copied().unwrap_or(CellStatus::Eliminated)
    }

    fn eliminate(&mut self, y: u32) -> Result<bool> {
        match self.cells.get_mut(y as usize) {
            Some(c @ CellStatus::Unknown) => {
                *c = CellStatus::Eliminated;
                self.unknown -= 1;
                Ok(self.unknown == 1)
            }
            _ => Err(CerError::integrity(format!("cell {y} is not unknown"))),
        }
    }

    fn resolve(&mut self, value: u32) -> Result<()> {
        match self.status(value) {
            CellStatus::Live => return Ok(()),
            CellStatus::Eliminated => {
                return Err(CerError::integrity(format!("resolve to eliminated cell {value}")))
            }
            CellStatus::Unknown => {}
        }
        for (y, c) in self.cells.iter_mut().enumerate() {
            *c = if y as u32 == value {
                CellStatus::Live
            } else {
                CellStatus::Eliminated
            };
        }
        self.unknown = 0;
        Ok(())
    }

    fn resolved(&self) -> Option<u32> {
        self.cells.iter().position(|&c| c == CellStatus::Live).map(|y| y as u32)
    }

    fn extremes(&self) -> Option<(u32, u32)> {
        Some((self.lowest_unknown()? as u32, self.highest_unknown()? as u32))
    }

    fn would_impose(&self, min: Option<u32>, max: Option<u32>) -> (i64, i64) {
        let lo = self.lowest_unknown().map_or(-1, |y| y as i64 - 1);
        let hi = self.highest_unknown().map_or(-1, |y| y as i64 + 1);
        let lo = min.map_or(lo, |m| lo.max(m as i64 - 1));
        let hi = max.map_or(hi, |m| hi.min(m as i64 + 1));
        (lo, hi)
    }

    fn impose(&mut self, min: Option<u32>, max: Option<u32>) -> u32 {
        let mut removed = 0;
        for (y, c) in self.cells.iter_mut().enumerate() {
            let y = y as u32;
            let outside = min.is_some_and(|m| y < m) || max.is_some_and(|m| y > m);
            if outside && *c == CellStatus::Unknown {
                *c = CellStatus::Eliminated;
                removed += 1;
            }
        }
        self.unknown -= removed;
        removed
    }
}
