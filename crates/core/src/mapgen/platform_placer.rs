//! Strategic platform placement (§4.11): an iterative loop that scores
//! critical-ring tiles, proposes platform shapes, and accepts only
//! those whose insertion strictly increases reachable area.

use std::collections::HashSet;

use crate::config::PlatformPlacerConfig;
use crate::grid::Grid;
use crate::mapgen::physics::{reachable_from, PhysicsConstants};
use crate::mapgen::{critical_ring, frontier};
use crate::model::{Platform, PlatformDirection, PlatformKind};
use crate::rng::SeededRng;
use crate::types::{Pos, Tile};

/// Runs the accept-only-if-improving loop, mutating `grid` in place and
/// returning the accepted platforms. `forbidden` tiles (spawn body,
/// main points, already-placed coins) are never covered by a platform.
pub fn place(
    grid: &mut Grid,
    spawn: Pos,
    forbidden: &HashSet<Pos>,
    config: &PlatformPlacerConfig,
    physics: &PhysicsConstants,
    rng: &mut SeededRng,
) -> Vec<Platform> {
    let mut accepted = Vec::new();
    let non_wall = (grid.width() * grid.height() - grid.wall_count()) as f64;
    if non_wall <= 0.0 {
        return accepted;
    }

    let mut reachable = reachable_from(grid, spawn, None, physics);
    let mut iterations = 0u32;

    loop {
        let fraction = reachable.len() as f64 / non_wall;
        if fraction >= config.target_reachability || iterations >= config.max_iterations {
            break;
        }

        let frontier_tiles = frontier::compute(&reachable, grid);
        let ring = critical_ring::compute(&reachable, &frontier_tiles);
        if ring.is_empty() {
            break;
        }

        let mut scored: Vec<(i64, Pos)> = ring
            .iter()
            .map(|&pos| (unreachable_mass(grid, &reachable, pos, config.score_window), pos))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut accepted_this_round = false;
        'candidates: for &(_, reference) in &scored {
            for direction in [PlatformDirection::Right, PlatformDirection::Left] {
                let mut sizes: Vec<u32> =
                    valid_sizes(grid, reference, direction, forbidden, spawn, config.min_size, config.max_size);
                rng.shuffle(&mut sizes);

                for size in sizes {
                    let platform = Platform {
                        kind: if rng.chance(config.floating_probability) {
                            PlatformKind::Floating
                        } else {
                            PlatformKind::Moving
                        },
                        x: reference.x,
                        y: reference.y,
                        width: size,
                        direction,
                    };

                    let mut trial_grid = grid.clone();
                    for tile in platform.occupied_tiles() {
                        trial_grid.set(tile, Tile::Wall);
                    }
                    let trial_reachable = reachable_from(&trial_grid, spawn, None, physics);
                    if trial_reachable.len() <= reachable.len() {
                        continue;
                    }

                    *grid = trial_grid;
                    reachable = trial_reachable;
                    accepted.push(platform);
                    accepted_this_round = true;
                    iterations += 1;
                    break 'candidates;
                }
            }
        }

        if !accepted_this_round {
            break;
        }
    }

    accepted
}

fn valid_sizes(
    grid: &Grid,
    reference: Pos,
    direction: PlatformDirection,
    forbidden: &HashSet<Pos>,
    spawn: Pos,
    min_size: u32,
    max_size: u32,
) -> Vec<u32> {
    let spawn_body = [spawn, spawn.offset(0, -1)];
    (min_size..=max_size)
        .filter(|&size| {
            let platform = Platform { kind: PlatformKind::Floating, x: reference.x, y: reference.y, width: size, direction };
            platform.occupied_tiles().iter().all(|tile| {
                grid.in_bounds(*tile)
                    && grid.get(*tile) == Tile::Floor
                    && !forbidden.contains(tile)
                    && !spawn_body.contains(tile)
            })
        })
        .collect()
}

fn unreachable_mass(grid: &Grid, reachable: &[Pos], center: Pos, half_window: u32) -> i64 {
    let reachable_set: HashSet<Pos> = reachable.iter().copied().collect();
    let half_window = half_window as i32;
    let mut mass = 0i64;
    for dy in -half_window..=half_window {
        for dx in -half_window..=half_window {
            let pos = center.offset(dx, dy);
            if grid.in_bounds(pos) && grid.get(pos) == Tile::Floor && !reachable_set.contains(&pos) {
                mass += 1;
            }
        }
    }
    mass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_already_at_target_places_nothing() {
        let mut grid = Grid::new(6, 6);
        for y in 1..5 {
            for x in 1..5 {
                grid.set(Pos::new(x, y), Tile::Floor);
            }
        }
        grid.set(Pos::new(2, 5), Tile::Wall); // not relevant; grid open
        let config = PlatformPlacerConfig { target_reachability: 0.0, ..PlatformPlacerConfig::default() };
        let physics = PhysicsConstants::default();
        let mut rng = SeededRng::from_named_seed("abc", "platform-seed");
        let before = grid.to_bytes();
        let placed = place(&mut grid, Pos::new(1, 1), &HashSet::new(), &config, &physics, &mut rng);
        assert!(placed.is_empty());
        assert_eq!(grid.to_bytes(), before);
    }

    #[test]
    fn accepted_platforms_strictly_increase_reachable_count() {
        let mut grid = Grid::new(14, 10);
        for y in 1..9 {
            for x in 1..13 {
                grid.set(Pos::new(x, y), Tile::Floor);
            }
        }
        // Carve an isolated high ledge only reachable via a platform.
        for x in 1..13 {
            grid.set(Pos::new(x, 7), Tile::Wall);
        }
        grid.set(Pos::new(6, 7), Tile::Floor);

        let config = PlatformPlacerConfig::default();
        let physics = PhysicsConstants::default();
        let mut rng = SeededRng::from_named_seed("abc", "platform-seed");
        let spawn = Pos::new(2, 8);
        let before = reachable_from(&grid, spawn, None, &physics).len();
        let placed = place(&mut grid, spawn, &HashSet::new(), &config, &physics, &mut rng);
        let after = reachable_from(&grid, spawn, None, &physics).len();
        if !placed.is_empty() {
            assert!(after > before);
        }
    }
}
