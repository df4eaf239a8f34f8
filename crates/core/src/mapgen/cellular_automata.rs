//! Birth/survival smoothing over a Moore neighborhood (§4.3).

use crate::config::GenerationConfig;
use crate::grid::Grid;
use crate::types::{Pos, Tile};

/// Runs `config.simulation_steps` iterations of the birth/survival rule
/// in place. Out-of-bounds neighbors count as walls (the grid's own
/// `get` convention), so the rule needs no special edge handling.
pub fn simulate(grid: &mut Grid, config: &GenerationConfig) {
    for _ in 0..config.simulation_steps {
        step(grid, config.birth_threshold, config.survival_threshold);
    }
}

fn step(grid: &mut Grid, birth_threshold: u32, survival_threshold: u32) {
    let positions: Vec<Pos> = grid.positions().collect();
    let mut next = Vec::with_capacity(positions.len());
    for pos in &positions {
        let neighbors = wall_neighbor_count(grid, *pos);
        let tile = match grid.get(*pos) {
            Tile::Wall => {
                if neighbors >= survival_threshold { Tile::Wall } else { Tile::Floor }
            }
            Tile::Floor => {
                if neighbors >= birth_threshold { Tile::Wall } else { Tile::Floor }
            }
        };
        next.push(tile);
    }
    for (pos, tile) in positions.into_iter().zip(next) {
        grid.set(pos, tile);
    }
}

fn wall_neighbor_count(grid: &Grid, pos: Pos) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if grid.get(pos.offset(dx, dy)) == Tile::Wall {
                count += 1;
            }
        }
    }
    count
}
