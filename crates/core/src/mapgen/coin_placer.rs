//! Reachable coin placement (§4.13): samples reachable tiles across
//! dead-end, exploration, and general buckets with spacing and
//! open-neighborhood constraints.

use crate::config::CoinPlacerConfig;
use crate::grid::Grid;
use crate::mapgen::physics::{reachable_from, PhysicsConstants};
use crate::model::{Coin, Platform};
use crate::rng::SeededRng;
use crate::types::{Pos, Tile};

/// A grid tile is "open" when its eight 8-neighbors are all in-bounds
/// floor (I4); a dead-end has exactly one floor 4-neighbor.
fn is_open_neighborhood(grid: &Grid, pos: Pos) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbor = pos.offset(dx, dy);
            if !grid.in_bounds(neighbor) || grid.get(neighbor) != Tile::Floor {
                return false;
            }
        }
    }
    true
}

fn is_dead_end(grid: &Grid, pos: Pos) -> bool {
    let floor_neighbors = [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .iter()
        .filter(|&&(dx, dy)| {
            let neighbor = pos.offset(dx, dy);
            grid.in_bounds(neighbor) && grid.get(neighbor) == Tile::Floor
        })
        .count();
    floor_neighbors == 1
}

/// A tile scores as an exploration candidate when its normalized
/// distance from the grid center is at least 0.5; this threshold
/// keeps all three buckets populated on typical cave shapes.
fn is_exploration_area(grid: &Grid, pos: Pos) -> bool {
    let center = Pos::new(grid.width() as i32 / 2, grid.height() as i32 / 2);
    let max_corner_dist = center.euclidean(Pos::new(0, 0)).max(1.0);
    pos.euclidean(center) / max_corner_dist >= 0.5
}

fn collides_with_platform(platforms: &[Platform], pos: Pos) -> bool {
    platforms.iter().any(|platform| platform.occupied_tiles().contains(&pos))
}

/// Places coins. Fails hard (returns `Err`) if the reachable fraction
/// from `spawn` falls under `config.min_reachable_fraction` — a sign
/// earlier phases failed to produce a traversable cave.
pub fn place(
    grid: &Grid,
    spawn: Pos,
    platforms: &[Platform],
    config: &CoinPlacerConfig,
    physics: &PhysicsConstants,
    rng: &mut SeededRng,
) -> Result<Vec<Coin>, String> {
    let reachable = reachable_from(grid, spawn, None, physics);
    let non_wall = grid.width() * grid.height() - grid.wall_count();
    if non_wall == 0 || reachable.len() as f64 / non_wall as f64 < config.min_reachable_fraction {
        return Err(format!(
            "reachable fraction {:.2} is below the minimum {:.2}; the cave is not traversable enough for coins",
            if non_wall == 0 { 0.0 } else { reachable.len() as f64 / non_wall as f64 },
            config.min_reachable_fraction
        ));
    }

    let valid: Vec<Pos> = reachable
        .iter()
        .copied()
        .filter(|&pos| !collides_with_platform(platforms, pos))
        .filter(|&pos| is_open_neighborhood(grid, pos))
        .collect();

    let mut dead_end_bucket = Vec::new();
    let mut exploration_bucket = Vec::new();
    let mut general_bucket = Vec::new();
    for pos in &valid {
        if is_dead_end(grid, *pos) {
            dead_end_bucket.push(*pos);
        } else if is_exploration_area(grid, *pos) {
            exploration_bucket.push(*pos);
        } else {
            general_bucket.push(*pos);
        }
    }

    let target = (config.coin_count as usize).min(valid.len());
    let dead_end_target = ((target as f64) * config.dead_end_weight).floor() as usize;
    let exploration_target = ((target as f64) * config.exploration_weight).floor() as usize;
    let general_target = target.saturating_sub(dead_end_target + exploration_target);

    let mut coins = Vec::new();
    for (bucket, count) in [
        (&mut dead_end_bucket, dead_end_target),
        (&mut exploration_bucket, exploration_target),
        (&mut general_bucket, general_target),
    ] {
        rng.shuffle(bucket);
        let mut placed_from_this_bucket = 0usize;
        for &candidate in bucket.iter() {
            if coins.len() >= target {
                break;
            }
            if placed_from_this_bucket >= count {
                break;
            }
            let far_enough = coins
                .iter()
                .all(|coin: &Coin| Pos::new(coin.x, coin.y).euclidean(candidate) >= config.min_distance);
            if far_enough {
                coins.push(Coin { x: candidate.x, y: candidate.y });
                placed_from_this_bucket += 1;
            }
        }
    }

    Ok(coins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                grid.set(Pos::new(x as i32, y as i32), Tile::Floor);
            }
        }
        grid
    }

    #[test]
    fn fails_when_reachable_fraction_too_low() {
        let grid = Grid::new(20, 20); // all wall: zero reachability
        let config = CoinPlacerConfig::default();
        let physics = PhysicsConstants::default();
        let mut rng = SeededRng::from_named_seed("abc", "coin-seed");
        let result = place(&grid, Pos::new(1, 1), &[], &config, &physics, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn placed_coins_have_open_eight_neighborhoods() {
        let grid = open_grid(40, 20);
        let config = CoinPlacerConfig::default();
        let physics = PhysicsConstants::default();
        let mut rng = SeededRng::from_named_seed("abc", "coin-seed");
        let coins = place(&grid, Pos::new(2, 2), &[], &config, &physics, &mut rng).expect("coins");
        for coin in &coins {
            assert!(is_open_neighborhood(&grid, Pos::new(coin.x, coin.y)));
        }
    }

    #[test]
    fn placed_coins_respect_minimum_spacing() {
        let grid = open_grid(60, 30);
        let config = CoinPlacerConfig::default();
        let physics = PhysicsConstants::default();
        let mut rng = SeededRng::from_named_seed("abc", "coin-seed");
        let coins = place(&grid, Pos::new(2, 2), &[], &config, &physics, &mut rng).expect("coins");
        for i in 0..coins.len() {
            for j in (i + 1)..coins.len() {
                let a = Pos::new(coins[i].x, coins[i].y);
                let b = Pos::new(coins[j].x, coins[j].y);
                assert!(a.euclidean(b) >= config.min_distance);
            }
        }
    }
}
