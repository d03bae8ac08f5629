// crates/cer-core/tests/catalogue_coherence.rs

use cer_core::catalogue::{CellCatalogue, CellStatus, ColumnCatalogue, GridColumn, LimitsColumn, Sides};

fn lcg_next(x: &mut u64) -> u64 {
    // deterministic, not crypto
    *x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
    *x
}

/// Eliminate frontier cells at random until every column is critical,
/// checking that the counts always add up.
fn drain<C: ColumnCatalogue>(seed: u64) {
    let (len, v) = (12usize, 9u32);
    let mut cat: CellCatalogue<C> = CellCatalogue::new(len, v);
    let mut seed = seed;

    loop {
        let frontier: Vec<(usize, u32)> = cat
            .extreme_unknown_cells(Sides::BOTH)
            .filter(|&(x, _)| cat.unknown_count(x) > 1)
            .collect();
        if frontier.is_empty() {
            break;
        }
        let (x, y) = frontier[(lcg_next(&mut seed) % frontier.len() as u64) as usize];
        let critical = cat.eliminate(x, y).unwrap();
        assert_eq!(critical, cat.unknown_count(x) == 1);
        assert_eq!(cat.status(x, y), CellStatus::Eliminated);
        assert_eq!(cat.total_unknown() + cat.eliminations(), len as u64 * v as u64);
    }

    for x in 0..len {
        let y = cat.critical_value(x).unwrap();
        assert_eq!(cat.status(x, y), CellStatus::Unknown);
        cat.eliminate_column(x, y).unwrap();
        assert_eq!(cat.resolved(x), Some(y));
    }
    assert_eq!(cat.total_unknown(), 0);
    assert_eq!(cat.eliminations(), len as u64 * (v as u64 - 1));
}

#[test]
fn limits_catalogue_stays_coherent() {
    for seed in [1, 2, 3, 99] {
        drain::<LimitsColumn>(seed);
    }
}

#[test]
fn grid_catalogue_stays_coherent() {
    for seed in [1, 2, 3, 99] {
        drain::<GridColumn>(seed);
    }
}

#[test]
fn both_representations_agree_on_frontier_eliminations() {
    let mut limits: CellCatalogue<LimitsColumn> = CellCatalogue::new(5, 20);
    let mut grid: CellCatalogue<GridColumn> = CellCatalogue::new(5, 20);
    limits.impose(Some(2), Some(17)).unwrap();
    grid.impose(Some(2), Some(17)).unwrap();

    let mut seed = 5;
    for _ in 0..40 {
        let cells: Vec<_> = limits.extreme_unknown_cells(Sides::BOTH).collect();
        assert_eq!(cells, grid.extreme_unknown_cells(Sides::BOTH).collect::<Vec<_>>());
        let (x, y) = cells[(lcg_next(&mut seed) % cells.len() as u64) as usize];
        if limits.unknown_count(x) <= 1 {
            continue;
        }
        assert_eq!(limits.eliminate(x, y).unwrap(), grid.eliminate(x, y).unwrap());
        for q in 0..5 {
            assert_eq!(limits.unknown_count(q), grid.unknown_count(q));
            assert_eq!(limits.clamp(q, -1), grid.clamp(q, -1));
            assert_eq!(limits.clamp(q, 99), grid.clamp(q, 99));
        }
    }
    assert_eq!(limits.eliminations(), grid.eliminations());
}

#[test]
fn low_side_only_frontier() {
    let cat: CellCatalogue = CellCatalogue::new(3, 4);
    let low: Vec<_> = cat.extreme_unknown_cells(Sides { low: true, high: false }).collect();
    assert_eq!(low, vec![(0, 0), (1, 0), (2, 0)]);
    let high: Vec<_> = cat.extreme_unknown_cells(Sides { low: false, high: true }).collect();
    assert_eq!(high, vec![(0, 3), (1, 3), (2, 3)]);
}
