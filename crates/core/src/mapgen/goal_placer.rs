//! Goal placement (§4.12), run post-platforms on a platform-stamped
//! grid so the goal is never placed under a platform.

use crate::config::GoalPlacerConfig;
use crate::grid::Grid;
use crate::mapgen::physics::on_solid_ground;
use crate::rng::SeededRng;
use crate::types::Pos;

pub struct GoalResult {
    pub pos: Pos,
    pub fallback_used: bool,
}

fn candidates(grid: &Grid, spawn: Pos, config: &GoalPlacerConfig) -> Vec<Pos> {
    let boundary_x = config
        .right_side_boundary
        .map(|boundary| (grid.width() as f64 * boundary).floor() as i32);

    grid.positions()
        .filter(|&pos| on_solid_ground(grid, pos))
        .filter(|&pos| pos.euclidean(spawn) >= config.min_start_goal_distance)
        .filter(|&pos| boundary_x.is_none_or(|boundary| pos.x >= boundary))
        .collect()
}

/// Sorts candidates by descending `x`, takes the top 20, then samples
/// one uniformly. Falls back to the unrestricted candidate set if the
/// right-side strip is empty; `None` if there is no candidate at all.
pub fn place(grid: &Grid, spawn: Pos, config: &GoalPlacerConfig, rng: &mut SeededRng) -> Option<GoalResult> {
    let mut restricted = candidates(grid, spawn, config);
    if !restricted.is_empty() {
        restricted.sort_by(|a, b| b.x.cmp(&a.x));
        restricted.truncate(20);
        return Some(GoalResult { pos: *rng.choice(&restricted), fallback_used: false });
    }

    let mut unrestricted = candidates(
        grid,
        spawn,
        &GoalPlacerConfig { right_side_boundary: None, ..config.clone() },
    );
    if unrestricted.is_empty() {
        return None;
    }
    unrestricted.sort_by(|a, b| b.x.cmp(&a.x));
    unrestricted.truncate(20);
    Some(GoalResult { pos: *rng.choice(&unrestricted), fallback_used: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tile;

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
    fn places_goal_far_enough_from_spawn() {
        let grid = open_grid(40, 20);
        let config = GoalPlacerConfig::default();
        let mut rng = SeededRng::from_named_seed("abc", "goal-seed");
        let result = place(&grid, Pos::new(2, 18), &config, &mut rng).expect("a goal candidate");
        assert!(result.pos.euclidean(Pos::new(2, 18)) >= config.min_start_goal_distance);
    }

    #[test]
    fn falls_back_when_right_strip_is_empty() {
        let grid = open_grid(20, 20);
        let mut config = GoalPlacerConfig::default();
        config.min_start_goal_distance = 5.0;
        config.right_side_boundary = Some(0.99);
        let mut rng = SeededRng::from_named_seed("abc", "goal-seed");
        let result = place(&grid, Pos::new(2, 18), &config, &mut rng);
        assert!(result.is_some());
    }

    #[test]
    fn no_candidates_yields_none() {
        let grid = Grid::new(10, 10);
        let config = GoalPlacerConfig::default();
        let mut rng = SeededRng::from_named_seed("abc", "goal-seed");
        assert!(place(&grid, Pos::new(1, 1), &config, &mut rng).is_none());
    }
}
