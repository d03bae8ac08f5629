// crates/cer-core/src/cer/state.rs
//
// Cell Elimination Run processor.
//
// Every unresolved column offers its lowest and highest unknown cell to the
// rankings. Cells are popped lowest score first. On the encoder a popped cell
// holding the true value is a hit and ends the run; otherwise the cell is
// eliminated. The press data records how many eliminations each run took, so
// the decoder, replaying the same pops, knows exactly which pop is the hit.
//
// A column left with one unknown cell is absorbed: that cell must be its
// value. The last run never hits; it ends when every column is resolved and
// its length is stored too, so a decoder can tell a complete block from a
// truncated one.

use tracing::{debug, debug_span, trace};

use crate::catalogue::{CellCatalogue, ColumnCatalogue, LimitsColumn, Sides};
use crate::cer::rankings::{RankedCell, Rankings, Side};
use crate::cer::scoring::Scoring;
use crate::config::CerConfig;
use crate::error::{CerError, Result};
use crate::spline::Spline;
use crate::validate::validate_block_params;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpMode {
    Encode,
    Decode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CerStats {
    pub hits: u64,
    pub absorptions: u64,
    pub eliminations: u64,
    pub runs: u64,
    pub peak_rankings: usize,
}

enum RunEnd {
    Hit(u64),
    Exhausted(u64),
}

pub struct CodecState {
    mode: OpMode,
    len: usize,
    value_range: u32,
    scoring: Scoring,
    spline: Spline,
    catalogue: CellCatalogue<LimitsColumn>,
    rankings: Rankings,
    source: Vec<u32>,
    values: Vec<Option<u32>>,
    stats: CerStats,
}

impl CodecState {
    pub fn for_encode(samples: &[u32], value_range: u32, range: Option<(u32, u32)>, config: &CerConfig) -> Result<Self> {
        if let Some((x, &v)) = samples.iter().enumerate().find(|&(_, &v)| v >= value_range) {
            return Err(CerError::validation(format!("sample {x} = {v} outside value range {value_range}")));
        }
        let endpoints = match samples {
            [] => [0, 0],
            [only] => [*only, *only],
            [first, .., last] => [*first, *last],
        };
        let mut state = Self::init(OpMode::Encode, samples.len(), value_range, endpoints, range, config)?;
        state.source = samples.to_vec();
        state.prime()?;
        Ok(state)
    }

    pub fn for_decode(
        len: usize,
        value_range: u32,
        endpoints: [u32; 2],
        range: Option<(u32, u32)>,
        config: &CerConfig,
    ) -> Result<Self> {
        let mut state = Self::init(OpMode::Decode, len, value_range, endpoints, range, config)?;
        state.prime()?;
        Ok(state)
    }

    fn init(
        mode: OpMode,
        len: usize,
        value_range: u32,
        endpoints: [u32; 2],
        range: Option<(u32, u32)>,
        config: &CerConfig,
    ) -> Result<Self> {
        validate_block_params(len, value_range)?;
        if endpoints.iter().any(|&e| e >= value_range) {
            return Err(CerError::parse(format!("endpoint {endpoints:?} outside value range {value_range}")));
        }
        let spline = Spline::new(len, value_range as u64, &config.spline_config(endpoints[0] as i64))?;
        Ok(Self {
            mode,
            len,
            value_range,
            scoring: config.scoring,
            spline,
            catalogue: CellCatalogue::new(len, value_range),
            rankings: Rankings::new(len),
            source: Vec::new(),
            values: vec![None; len],
            stats: CerStats::default(),
        }
        .with_endpoints(endpoints, range)?)
    }

    fn with_endpoints(mut self, endpoints: [u32; 2], range: Option<(u32, u32)>) -> Result<Self> {
        if self.len >= 1 {
            self.resolve(0, endpoints[0], false)?;
        }
        if self.len >= 2 {
            self.resolve(self.len - 1, endpoints[1], false)?;
        }
        if let Some((min, max)) = range {
            if min > max || max >= self.value_range {
                return Err(CerError::parse(format!("bad imposed range [{min}, {max}]")));
            }
            self.catalogue.impose(Some(min), Some(max))?;
        }
        Ok(self)
    }

    /// Absorb columns that start out critical, then rank every frontier cell.
    fn prime(&mut self) -> Result<()> {
        for x in 0..self.len {
            if let Some(y) = self.catalogue.critical_value(x) {
                self.resolve(x, y, false)?;
                self.stats.absorptions += 1;
            }
        }
        let frontier: Vec<(usize, u32)> = self.catalogue.extreme_unknown_cells(Sides::BOTH).collect();
        for (x, y) in frontier {
            let side = match self.catalogue.column(x).extremes() {
                Some((lo, _)) if lo == y => Side::Low,
                _ => Side::High,
            };
            self.rank(side, x, y);
        }
        Ok(())
    }

    pub fn mode(&self) -> OpMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stats(&self) -> CerStats {
        CerStats {
            peak_rankings: self.rankings.peak(),
            ..self.stats
        }
    }

    pub fn catalogue(&self) -> &CellCatalogue<LimitsColumn> {
        &self.catalogue
    }

    pub fn spline(&self) -> &Spline {
        &self.spline
    }

    /// Frontier cells still waiting in the rankings.
    pub fn pending(&self) -> usize {
        self.rankings.len()
    }

    pub fn values(&self) -> &[Option<u32>] {
        &self.values
    }

    fn rank(&mut self, side: Side, x: usize, y: u32) {
        let score = self.scoring.score(&mut self.spline, x, y);
        self.rankings.insert(side, RankedCell { score, x, y });
    }

    /// Re-rank both frontier cells of every unresolved column in `lo..=hi`.
    fn rescore(&mut self, lo: usize, hi: usize) {
        for x in lo..=hi.min(self.len.saturating_sub(1)) {
            if let Some((a, b)) = self.catalogue.column(x).extremes() {
                self.rank(Side::Low, x, a);
                if b != a {
                    self.rank(Side::High, x, b);
                }
            }
        }
    }

    /// Record the value of column `x` and make it a spline bone.
    fn resolve(&mut self, x: usize, y: u32, rescore: bool) -> Result<()> {
        if self.mode == OpMode::Encode {
            if let Some(&truth) = self.source.get(x) {
                if truth != y {
                    return Err(CerError::integrity(format!(
                        "column {x} resolved to {y}, sample is {truth}"
                    )));
                }
            }
        }
        self.catalogue.eliminate_column(x, y)?;
        self.rankings.remove_column(x);
        self.values[x] = Some(y);

        let (lo, hi) = self.spline.influence_span(x);
        self.spline.set(x, y as i64);
        if rescore {
            let w = self.scoring.window();
            self.rescore(lo.saturating_sub(w), hi + w);
        }
        Ok(())
    }

    fn is_hit(&self, cell: &RankedCell, steps: u64, target: Option<u64>) -> bool {
        match self.mode {
            OpMode::Encode => self.source.get(cell.x) == Some(&cell.y),
            OpMode::Decode => target == Some(steps),
        }
    }

    fn step_bound(&self) -> u64 {
        (self.len as u64 + 1) * (self.value_range as u64 + 1) + 2
    }

    fn process_run(&mut self, target: Option<u64>) -> Result<RunEnd> {
        let bound = self.step_bound();
        let mut steps = 0u64;
        loop {
            if steps > bound {
                return Err(CerError::integrity(format!("run exceeded {bound} steps")));
            }
            let Some((cell, side)) = self.rankings.pop_lowest() else {
                return Ok(RunEnd::Exhausted(steps));
            };

            if self.is_hit(&cell, steps, target) {
                trace!(x = cell.x, y = cell.y, steps, "hit");
                self.resolve(cell.x, cell.y, true)?;
                self.stats.hits += 1;
                return Ok(RunEnd::Hit(steps));
            }

            let critical = self.catalogue.eliminate(cell.x, cell.y)?;
            steps += 1;
            self.stats.eliminations += 1;

            if critical {
                let y = self
                    .catalogue
                    .critical_value(cell.x)
                    .ok_or_else(|| CerError::integrity(format!("critical column {} has no cell", cell.x)))?;
                trace!(x = cell.x, y, "absorb");
                self.resolve(cell.x, y, true)?;
                self.stats.absorptions += 1;
            } else if let Some((lo, hi)) = self.catalogue.column(cell.x).extremes() {
                let y = match side {
                    Side::Low => lo,
                    Side::High => hi,
                };
                self.rank(side, cell.x, y);
            }
        }
    }

    /// Run the encoder over the whole block and return the press data.
    pub fn encode(&mut self) -> Result<Vec<u64>> {
        if self.mode != OpMode::Encode {
            return Err(CerError::validation("encode on a decoding state"));
        }
        let span = debug_span!("cer_encode", len = self.len, value_range = self.value_range);
        let _enter = span.enter();

        let mut press = Vec::new();
        if self.rankings.is_empty() {
            return Ok(press);
        }
        let cap = self.len as u64 * (self.value_range as u64 - 1);
        let mut total = 0u64;
        loop {
            let (steps, done) = match self.process_run(None)? {
                RunEnd::Hit(s) => (s, false),
                RunEnd::Exhausted(s) => (s, true),
            };
            total += steps;
            if total > cap {
                return Err(CerError::integrity(format!("press total {total} exceeds {cap}")));
            }
            press.push(steps);
            self.stats.runs += 1;
            if done {
                break;
            }
        }
        debug!(
            runs = self.stats.runs,
            hits = self.stats.hits,
            absorptions = self.stats.absorptions,
            eliminations = self.stats.eliminations,
            "block encoded"
        );
        Ok(press)
    }

    /// Replay the press data; the last entry must be the length of the run
    /// that resolves the final column.
    pub fn decode(&mut self, press: &[u64]) -> Result<Vec<u32>> {
        if self.mode != OpMode::Decode {
            return Err(CerError::validation("decode on an encoding state"));
        }
        let span = debug_span!("cer_decode", len = self.len, value_range = self.value_range, runs = press.len());
        let _enter = span.enter();

        if self.rankings.is_empty() && !press.is_empty() {
            return Err(CerError::parse(format!("{} press entries for a block with nothing to resolve", press.len())));
        }
        if !self.rankings.is_empty() && press.is_empty() {
            return Err(CerError::parse("press data missing"));
        }

        for (r, &p) in press.iter().enumerate() {
            let last = r + 1 == press.len();
            let end = self.process_run(if last { None } else { Some(p) })?;
            self.stats.runs += 1;
            match (end, last) {
                (RunEnd::Hit(_), false) => {}
                (RunEnd::Exhausted(s), true) if s == p => {}
                (RunEnd::Exhausted(s), true) => {
                    return Err(CerError::integrity(format!("final run took {s} steps, press says {p}")))
                }
                (RunEnd::Exhausted(s), false) => {
                    return Err(CerError::parse(format!(
                        "press entry {r} = {p} but the block resolved after {s} steps"
                    )))
                }
                (RunEnd::Hit(_), true) => return Err(CerError::integrity("untargeted run reported a hit")),
            }
        }

        self.interpolate_missing_values();
        debug!(
            runs = self.stats.runs,
            hits = self.stats.hits,
            absorptions = self.stats.absorptions,
            eliminations = self.stats.eliminations,
            "block decoded"
        );
        Ok(self.values.iter().map(|v| v.unwrap_or(0)).collect())
    }

    /// Fill unresolved columns with their prediction, snapped into the
    /// column's unknown interval.
    pub fn interpolate_missing_values(&mut self) {
        for x in 0..self.len {
            if self.values[x].is_some() {
                continue;
            }
            let p = self.spline.predict(x);
            let y = match self.catalogue.clamp(x, p) {
                Ok(y) => y,
                Err(_) => p.clamp(0, self.value_range as i64 - 1) as u32,
            };
            self.values[x] = Some(y);
        }
    }
}
