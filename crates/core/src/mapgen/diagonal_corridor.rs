//! Detects and repairs impassable diagonal "staircases" (§4.6).

use crate::grid::Grid;
use crate::types::{Pos, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagonalFault {
    pub tile: Pos,
    pub diagonal: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FixReport {
    pub issues_found: u32,
    pub fixes_applied: u32,
}

/// One fault per offending floor tile: some diagonal neighbor is floor
/// while both axis-aligned "between" tiles are wall, which a
/// grid-axis-aligned mover cannot cross.
pub fn detect(grid: &Grid) -> Vec<DiagonalFault> {
    let mut faults = Vec::new();
    for pos in grid.positions() {
        if grid.get(pos) != Tile::Floor {
            continue;
        }
        for (dx, dy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            let diagonal = pos.offset(dx, dy);
            if grid.get(diagonal) != Tile::Floor {
                continue;
            }
            let horizontal_between = pos.offset(dx, 0);
            let vertical_between = pos.offset(0, dy);
            if grid.get(horizontal_between) == Tile::Wall && grid.get(vertical_between) == Tile::Wall {
                faults.push(DiagonalFault { tile: pos, diagonal });
            }
        }
    }
    faults
}

/// Carves one of the two blocking walls per fault, always preferring
/// the horizontal between-tile — a fixed choice, not an alternation,
/// so repeated runs on the same grid are idempotent.
pub fn fix(grid: &mut Grid) -> FixReport {
    let faults = detect(grid);
    let issues_found = faults.len() as u32;
    let mut fixes_applied = 0;
    for fault in faults {
        let dx = fault.diagonal.x - fault.tile.x;
        let dy = fault.diagonal.y - fault.tile.y;
        let horizontal_between = fault.tile.offset(dx, 0);
        if grid.get(horizontal_between) == Tile::Wall {
            grid.set(horizontal_between, Tile::Floor);
            fixes_applied += 1;
            continue;
        }
        let vertical_between = fault.tile.offset(0, dy);
        if grid.get(vertical_between) == Tile::Wall {
            grid.set(vertical_between, Tile::Floor);
            fixes_applied += 1;
        }
    }
    FixReport { issues_found, fixes_applied }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::{detect, fix};
    use crate::grid::Grid;
    use crate::types::{Pos, Tile};

    const WIDTH: usize = 12;
    const HEIGHT: usize = 12;

    fn arb_grid() -> impl Strategy<Value = Grid> {
        prop::collection::vec(any::<bool>(), WIDTH * HEIGHT).prop_map(|is_floor| {
            let mut grid = Grid::new(WIDTH, HEIGHT);
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let tile = if is_floor[y * WIDTH + x] { Tile::Floor } else { Tile::Wall };
                    grid.set(Pos::new(x as i32, y as i32), tile);
                }
            }
            grid
        })
    }

    proptest! {
        // `fix` only ever carves wall tiles to floor, so it can never
        // remove a floor tile that was already there.
        #[test]
        fn fix_only_ever_adds_floor_tiles(grid in arb_grid()) {
            let before: Vec<Pos> = grid.positions().filter(|&pos| grid.get(pos) == Tile::Floor).collect();
            let mut after_grid = grid.clone();
            fix(&mut after_grid);

            for pos in before {
                prop_assert_eq!(after_grid.get(pos), Tile::Floor);
            }
        }

        // Every fault `detect` reports on a grid is gone immediately
        // after `fix` carves it: no fault in the original snapshot
        // survives the pass that targeted it.
        #[test]
        fn fix_resolves_every_originally_detected_fault(grid in arb_grid()) {
            let original_faults = detect(&grid);
            let mut fixed = grid.clone();
            fix(&mut fixed);
            for fault in original_faults {
                let dx = fault.diagonal.x - fault.tile.x;
                let dy = fault.diagonal.y - fault.tile.y;
                let still_blocked = fixed.get(fault.tile.offset(dx, 0)) == Tile::Wall
                    && fixed.get(fault.tile.offset(0, dy)) == Tile::Wall;
                prop_assert!(!still_blocked);
            }
        }
    }
}
