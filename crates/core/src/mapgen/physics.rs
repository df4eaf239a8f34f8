//! Physics-aware reachability analysis (§4.7) — "the core of the core".
//!
//! Models a platformer character whose movement per "move" is a
//! ballistic jump initiated only from grounded tiles, optionally
//! followed by a triangular fall with lateral drift. Falling is free:
//! every tile visited mid-fall is added to the reachable set at the
//! same move count as the jump that launched it.

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::types::{Pos, Tile};

/// Tunable constants from §4.7.1. A reimplementation may expose these
/// as configuration; the `0.17`/`0.30` coefficients are preserved as
/// the source's tuned magic constants rather than derived from gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConstants {
    pub jump_height_px: f64,
    pub gravity_px_s2: f64,
    pub tile_size_px: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self { jump_height_px: 800.0, gravity_px_s2: 980.0, tile_size_px: 64.0 }
    }
}

impl PhysicsConstants {
    fn max_jump_pixels(&self) -> f64 {
        (self.jump_height_px * 0.17).floor()
    }

    fn max_jump_height_pixels(&self) -> f64 {
        self.jump_height_px * 0.30
    }

    pub fn max_jump_tiles(&self) -> i32 {
        (self.max_jump_pixels() / self.tile_size_px).floor() as i32
    }

    pub fn max_jump_height_tiles(&self) -> i32 {
        (self.max_jump_height_pixels() / self.tile_size_px).floor() as i32
    }
}

/// True iff `p` is floor and the tile directly below is wall (or `p` is
/// on the bottom row, which is never grounded — there is nothing below
/// to stand on).
pub fn on_solid_ground(grid: &Grid, p: Pos) -> bool {
    if grid.get(p) != Tile::Floor {
        return false;
    }
    let below = p.offset(0, 1);
    grid.in_bounds(below) && grid.get(below) == Tile::Wall
}

/// §4.7.3: can a grounded jump from `start` reach `end`?
pub fn is_reachable_by_jump(start: Pos, end: Pos, grid: &Grid, constants: &PhysicsConstants) -> bool {
    if !grid.in_bounds(start) || !on_solid_ground(grid, start) {
        return false;
    }
    let dx = (end.x - start.x).abs();
    let dy = end.y - start.y;

    if f64::from(dx) * constants.tile_size_px > constants.max_jump_pixels() {
        return false;
    }
    if f64::from(dy) * constants.tile_size_px < -constants.max_jump_height_pixels() {
        return false;
    }
    !bresenham_between(start, end).iter().any(|&tile| grid.get(tile) == Tile::Wall)
}

/// The tiles strictly between `start` and `end` on their Bresenham
/// segment (exclusive of both endpoints).
fn bresenham_between(start: Pos, end: Pos) -> Vec<Pos> {
    let mut points = Vec::new();
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let step_x = if start.x < end.x { 1 } else { -1 };
    let step_y = if start.y < end.y { 1 } else { -1 };
    let mut error = dx + dy;
    let mut x = start.x;
    let mut y = start.y;

    loop {
        if (x, y) != (start.x, start.y) && (x, y) != (end.x, end.y) {
            points.push(Pos::new(x, y));
        }
        if x == end.x && y == end.y {
            break;
        }
        let doubled_error = 2 * error;
        if doubled_error >= dy {
            error += dy;
            x += step_x;
        }
        if doubled_error <= dx {
            error += dx;
            y += step_y;
        }
    }
    points
}

/// §4.7.4: the triangle of tiles visited while falling from `start`,
/// including `start` itself. Branches stop when the tile directly below
/// is wall or off-grid (landed), or when the candidate tile is not
/// floor.
pub fn fall_from(start: Pos, grid: &Grid) -> Vec<Pos> {
    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut path = Vec::new();

    visited.insert(start);
    path.push(start);
    frontier.push_back(start);

    while let Some(pos) = frontier.pop_front() {
        for dx in [-1, 0, 1] {
            let candidate = Pos::new(pos.x + dx, pos.y + 1);
            if !grid.in_bounds(candidate) || grid.get(candidate) != Tile::Floor {
                continue;
            }
            if !visited.insert(candidate) {
                continue;
            }
            path.push(candidate);

            let below = candidate.offset(0, 1);
            if grid.in_bounds(below) && grid.get(below) == Tile::Floor {
                frontier.push_back(candidate);
            }
        }
    }

    path
}

/// Drops `start` straight down (no lateral drift) until it rests on
/// solid ground or the grid bottom. Not counted as a move.
fn drop_to_ground(start: Pos, grid: &Grid) -> Pos {
    let mut pos = start;
    while grid.in_bounds(pos) && grid.get(pos) == Tile::Floor && !on_solid_ground(grid, pos) {
        let below = pos.offset(0, 1);
        if !grid.in_bounds(below) || grid.get(below) != Tile::Floor {
            break;
        }
        pos = below;
    }
    pos
}

/// §4.7.5: full physics-aware reachability from `start`, expanding at
/// most `max_moves` jumps (`None` = unlimited). The result preserves
/// insertion order: BFS over moves, `dy` outer then `dx` inner among
/// same-move jump targets, fall expansion is RNG-free.
pub fn reachable_from(grid: &Grid, start: Pos, max_moves: Option<u32>, constants: &PhysicsConstants) -> Vec<Pos> {
    let start = drop_to_ground(start, grid);

    let mut visited_move: std::collections::HashMap<Pos, u32> = std::collections::HashMap::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    visited_move.insert(start, 0);
    order.push(start);
    queue.push_back((start, 0u32));

    let max_jump_tiles = constants.max_jump_tiles();
    let max_jump_height_tiles = constants.max_jump_height_tiles();

    while let Some((pos, moves)) = queue.pop_front() {
        if let Some(limit) = max_moves {
            if moves >= limit {
                continue;
            }
        }
        if !on_solid_ground(grid, pos) {
            continue;
        }

        for dy in -max_jump_height_tiles..=max_jump_height_tiles {
            for dx in -max_jump_tiles..=max_jump_tiles {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let target = pos.offset(dx, dy);
                if !grid.in_bounds(target) || grid.get(target) != Tile::Floor {
                    continue;
                }
                if !is_reachable_by_jump(pos, target, grid, constants) {
                    continue;
                }
                let next_moves = moves + 1;
                for fall_tile in fall_from(target, grid) {
                    let should_visit = visited_move
                        .get(&fall_tile)
                        .is_none_or(|&known| next_moves < known);
                    if should_visit {
                        let first_visit = !visited_move.contains_key(&fall_tile);
                        visited_move.insert(fall_tile, next_moves);
                        if first_visit {
                            order.push(fall_tile);
                        }
                        queue.push_back((fall_tile, next_moves));
                    }
                }
            }
        }
    }

    order
}

/// §4.7.6: multi-source reachability seeded from every grounded floor
/// tile, or (if none exist) from every floor tile in the topmost floor
/// row. The complement among floor tiles is the unreachable set.
pub fn unreachable(grid: &Grid, constants: &PhysicsConstants) -> Vec<Pos> {
    let mut sources: Vec<Pos> = grid.positions().filter(|&pos| on_solid_ground(grid, pos)).collect();

    if sources.is_empty() {
        if let Some(top_y) = grid.positions().find(|&pos| grid.get(pos) == Tile::Floor).map(|pos| pos.y) {
            sources = grid
                .positions()
                .filter(|&pos| pos.y == top_y && grid.get(pos) == Tile::Floor)
                .collect();
        }
    }

    let mut reached: HashSet<Pos> = HashSet::new();
    for &source in &sources {
        for pos in reachable_from(grid, source, None, constants) {
            reached.insert(pos);
        }
    }

    grid.positions().filter(|&pos| grid.get(pos) == Tile::Floor && !reached.contains(&pos)).collect()
}


#[cfg(test)]
mod proptests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::{drop_to_ground, reachable_from, PhysicsConstants};
    use crate::grid::Grid;
    use crate::types::{Pos, Tile};

    const WIDTH: usize = 10;
    const HEIGHT: usize = 8;

    /// A random `WIDTH`x`HEIGHT` grid with a forced wall border and an
    /// otherwise arbitrary interior, so every generated grid already
    /// satisfies I1 without biasing the interior layout.
    fn arb_grid() -> impl Strategy<Value = Grid> {
        prop::collection::vec(any::<bool>(), WIDTH * HEIGHT).prop_map(|is_wall| {
            let mut grid = Grid::new(WIDTH, HEIGHT);
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let border = y == 0 || y == HEIGHT - 1 || x == 0 || x == WIDTH - 1;
                    let tile = if border || is_wall[y * WIDTH + x] { Tile::Wall } else { Tile::Floor };
                    grid.set(Pos::new(x as i32, y as i32), tile);
                }
            }
            grid
        })
    }

    proptest! {
        // P2: the dropped start is always present at move count 0.
        #[test]
        fn dropped_start_is_always_in_its_own_reachable_set(
            grid in arb_grid(),
            sx in 1i32..(WIDTH as i32 - 1),
            sy in 1i32..(HEIGHT as i32 - 1),
        ) {
            let constants = PhysicsConstants::default();
            let start = Pos::new(sx, sy);
            let dropped = drop_to_ground(start, &grid);
            let reached = reachable_from(&grid, start, Some(0), &constants);
            prop_assert!(reached.contains(&dropped));
        }

        // P3: expanding maxMoves never shrinks the reachable set.
        #[test]
        fn reachable_set_grows_monotonically_with_max_moves(
            grid in arb_grid(),
            sx in 1i32..(WIDTH as i32 - 1),
            sy in 1i32..(HEIGHT as i32 - 1),
            k in 0u32..4,
        ) {
            let constants = PhysicsConstants::default();
            let start = Pos::new(sx, sy);
            let smaller: HashSet<Pos> = reachable_from(&grid, start, Some(k), &constants).into_iter().collect();
            let larger: HashSet<Pos> = reachable_from(&grid, start, Some(k + 1), &constants).into_iter().collect();
            prop_assert!(smaller.is_subset(&larger));
        }
    }
}
