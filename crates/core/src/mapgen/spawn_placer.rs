//! Player spawn placement (§4.10): a grounded tile with a safe landing
//! zone, biased to the left strip of the cave.

use crate::config::SpawnPlacerConfig;
use crate::grid::Grid;
use crate::mapgen::physics::on_solid_ground;
use crate::rng::SeededRng;
use crate::types::{Pos, Tile};

pub struct SpawnResult {
    pub pos: Pos,
    pub fallback_used: bool,
    pub warning: Option<String>,
}

/// A position is "safe" if, within `config.safety_radius` tiles in one
/// of the four cardinal directions, a floor tile is reachable without
/// crossing a wall.
fn is_safe(grid: &Grid, pos: Pos, radius: u32) -> bool {
    let radius = radius as i32;
    [(1, 0), (-1, 0), (0, 1), (0, -1)].iter().any(|&(dx, dy)| {
        (1..=radius).all(|step| {
            let probe = pos.offset(dx * step, dy * step);
            grid.in_bounds(probe) && grid.get(probe) == Tile::Floor
        })
    })
}

fn valid_spawn_candidates(grid: &Grid, config: &SpawnPlacerConfig) -> Vec<Pos> {
    grid.positions()
        .filter(|&pos| on_solid_ground(grid, pos))
        .filter(|&pos| is_safe(grid, pos, config.safety_radius))
        .collect()
}

/// Places the spawn. Restricts the search to `x < floor(width *
/// left_side_boundary)` first; if that subset is empty, falls back to
/// the full candidate set and reports `fallback_used`.
pub fn place(grid: &Grid, config: &SpawnPlacerConfig, rng: &mut SeededRng) -> Option<SpawnResult> {
    let candidates = valid_spawn_candidates(grid, config);
    if candidates.is_empty() {
        return None;
    }

    let boundary_x = (grid.width() as f64 * config.left_side_boundary).floor() as i32;
    let left_strip: Vec<Pos> = candidates.iter().copied().filter(|pos| pos.x < boundary_x).collect();

    if !left_strip.is_empty() {
        let pos = *rng.choice(&left_strip);
        return Some(SpawnResult { pos, fallback_used: false, warning: None });
    }

    let pos = *rng.choice(&candidates);
    Some(SpawnResult {
        pos,
        fallback_used: true,
        warning: Some("no valid spawn candidate inside the left-side boundary; using full candidate set".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = if ch == '#' { Tile::Wall } else { Tile::Floor };
                grid.set(Pos::new(x as i32, y as i32), tile);
            }
        }
        grid
    }

    #[test]
    fn places_spawn_on_solid_ground() {
        let grid = grid_from_rows(&["######", "#....#", "######"]);
        let config = SpawnPlacerConfig::default();
        let mut rng = SeededRng::from_named_seed("abc", "spawn-seed");
        let result = place(&grid, &config, &mut rng).expect("a spawn candidate");
        assert!(on_solid_ground(&grid, result.pos));
    }

    #[test]
    fn falls_back_when_left_strip_is_empty() {
        let grid = grid_from_rows(&["##########", "#........#", "##########"]);
        let mut config = SpawnPlacerConfig::default();
        config.left_side_boundary = 0.0;
        let mut rng = SeededRng::from_named_seed("abc", "spawn-seed");
        let result = place(&grid, &config, &mut rng).expect("a spawn candidate");
        assert!(result.fallback_used);
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        let grid = Grid::new(5, 5);
        let config = SpawnPlacerConfig::default();
        let mut rng = SeededRng::from_named_seed("abc", "spawn-seed");
        assert!(place(&grid, &config, &mut rng).is_none());
    }
}
