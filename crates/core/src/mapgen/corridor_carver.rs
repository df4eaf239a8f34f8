//! Connects all disconnected floor regions into one (§4.5).

use crate::grid::Grid;
use crate::mapgen::region_detector::{self, RegionMap};
use crate::rng::SeededRng;
use crate::types::{Pos, Tile};

/// Repeatedly connects the nearest pair of still-disconnected regions
/// until region detection reports exactly one component. `M-1`
/// corridors suffice for `M` regions; re-detecting after each carve
/// keeps the loop correct even though a carved corridor can merge more
/// than two regions at once.
pub fn carve(grid: &mut Grid, rng: &mut SeededRng) {
    loop {
        let map = region_detector::detect(grid);
        if map.regions.len() <= 1 {
            return;
        }
        let (from, to) = nearest_unconnected_pair(&map);
        carve_corridor(grid, from, to, rng);
    }
}

fn region_representative(map: &RegionMap, region_index: usize) -> Pos {
    let region = &map.regions[region_index];
    Pos::new((region.lo.x + region.hi.x) / 2, (region.lo.y + region.hi.y) / 2)
}

fn nearest_unconnected_pair(map: &RegionMap) -> (Pos, Pos) {
    let mut best: Option<(f64, Pos, Pos)> = None;
    for i in 0..map.regions.len() {
        for j in (i + 1)..map.regions.len() {
            let a = region_representative(map, i);
            let b = region_representative(map, j);
            let distance = a.euclidean(b);
            if best.as_ref().is_none_or(|(best_distance, _, _)| distance < *best_distance) {
                best = Some((distance, a, b));
            }
        }
    }
    let (_, a, b) = best.expect("nearest_unconnected_pair requires at least two regions");
    (a, b)
}

/// Carves a straight or L-shaped 1-tile corridor from `a` to `b`,
/// choosing the bend order with the supplied RNG so repeated calls from
/// an identical region layout stay deterministic without looking
/// visually uniform.
fn carve_corridor(grid: &mut Grid, a: Pos, b: Pos, rng: &mut SeededRng) {
    if rng.chance(0.5) {
        carve_horizontal_then_vertical(grid, a, b);
    } else {
        carve_vertical_then_horizontal(grid, a, b);
    }
}

fn carve_horizontal_then_vertical(grid: &mut Grid, a: Pos, b: Pos) {
    let mut x = a.x;
    let step_x = if b.x >= a.x { 1 } else { -1 };
    while x != b.x {
        grid.set(Pos::new(x, a.y), Tile::Floor);
        x += step_x;
    }
    let mut y = a.y;
    let step_y = if b.y >= a.y { 1 } else { -1 };
    while y != b.y {
        grid.set(Pos::new(b.x, y), Tile::Floor);
        y += step_y;
    }
    grid.set(b, Tile::Floor);
}

fn carve_vertical_then_horizontal(grid: &mut Grid, a: Pos, b: Pos) {
    let mut y = a.y;
    let step_y = if b.y >= a.y { 1 } else { -1 };
    while y != b.y {
        grid.set(Pos::new(a.x, y), Tile::Floor);
        y += step_y;
    }
    let mut x = a.x;
    let step_x = if b.x >= a.x { 1 } else { -1 };
    while x != b.x {
        grid.set(Pos::new(x, b.y), Tile::Floor);
        x += step_x;
    }
    grid.set(b, Tile::Floor);
}

/// Reopens a radius-`radius` floor disc around each main point (§4.5
/// post-processing step 1) so graph-seeded anchors survive cellular
/// automata smoothing and corridor carving.
pub fn reopen_main_point_discs(grid: &mut Grid, main_points: &[Pos], radius: i32) {
    for &center in main_points {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = center.offset(dx, dy);
                if grid.in_bounds(pos) && dx * dx + dy * dy <= radius * radius {
                    grid.set(pos, Tile::Floor);
                }
            }
        }
    }
}

/// Iteratively thickens "1-tile corridors": a floor tile blocked on both
/// opposite sides by wall gets its up-or-left neighbor carved, repeated
/// to a fixpoint (§4.5 post-processing step 2).
pub fn thicken_one_tile_corridors(grid: &mut Grid) {
    loop {
        let mut changed = false;
        for pos in grid.positions() {
            if grid.get(pos) != Tile::Floor {
                continue;
            }
            let left = grid.get(pos.offset(-1, 0));
            let right = grid.get(pos.offset(1, 0));
            let up = grid.get(pos.offset(0, -1));
            let down = grid.get(pos.offset(0, 1));

            if left == Tile::Wall && right == Tile::Wall {
                let target = if pos.y > 0 { pos.offset(0, -1) } else { Pos::new(pos.x, 1) };
                if grid.get(target) == Tile::Wall {
                    grid.set(target, Tile::Floor);
                    changed = true;
                }
            } else if up == Tile::Wall && down == Tile::Wall {
                let target = if pos.x > 0 { pos.offset(-1, 0) } else { Pos::new(1, pos.y) };
                if grid.get(target) == Tile::Wall {
                    grid.set(target, Tile::Floor);
                    changed = true;
                }
            }
        }
        if !changed {
            return;
        }
    }
}
