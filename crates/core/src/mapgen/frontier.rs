//! Frontier analysis (§4.8): reachable tiles touching unreachable floor.

use std::collections::HashSet;

use crate::grid::Grid;
use crate::types::{Pos, Tile};

/// `t in reachable` is frontier iff at least one of its 4-neighbors is
/// an in-bounds floor tile not in `reachable`. Preserves `reachable`'s
/// insertion order.
pub fn compute(reachable: &[Pos], grid: &Grid) -> Vec<Pos> {
    let reachable_set: HashSet<Pos> = reachable.iter().copied().collect();
    reachable
        .iter()
        .copied()
        .filter(|&pos| {
            [(1, 0), (-1, 0), (0, 1), (0, -1)].iter().any(|&(dx, dy)| {
                let neighbor = pos.offset(dx, dy);
                grid.in_bounds(neighbor)
                    && grid.get(neighbor) == Tile::Floor
                    && !reachable_set.contains(&neighbor)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_next_to_unreachable_floor_is_frontier() {
        let mut grid = Grid::new(5, 3);
        for x in 1..4 {
            grid.set(Pos::new(x, 1), Tile::Floor);
        }
        let reachable = vec![Pos::new(1, 1), Pos::new(2, 1)];
        let frontier = compute(&reachable, &grid);
        assert_eq!(frontier, vec![Pos::new(2, 1)]);
    }

    #[test]
    fn fully_enclosed_reachable_set_has_no_frontier() {
        let mut grid = Grid::new(4, 4);
        grid.set(Pos::new(1, 1), Tile::Floor);
        let reachable = vec![Pos::new(1, 1)];
        assert!(compute(&reachable, &grid).is_empty());
    }
}
