//! Flood-fills connected floor components (§4.4).

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::model::Region;
use crate::types::{Pos, Tile};

pub struct RegionMap {
    /// `0` = unlabeled floor (never occurs in a returned map), `1` = wall
    /// sentinel, `>=2` = region label.
    labels: Vec<u32>,
    width: usize,
    pub regions: Vec<Region>,
}

impl RegionMap {
    pub fn label_at(&self, pos: Pos) -> u32 {
        self.labels[pos.y as usize * self.width + pos.x as usize]
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

const WALL_SENTINEL: u32 = 1;
const FIRST_LABEL: u32 = 2;

/// Labels every 4-connected floor component in `(x,y)` scan order.
pub fn detect(grid: &Grid) -> RegionMap {
    let mut labels = vec![WALL_SENTINEL; grid.width() * grid.height()];
    let mut regions = Vec::new();
    let mut next_label = FIRST_LABEL;

    for pos in grid.positions() {
        let index = pos.y as usize * grid.width() + pos.x as usize;
        if grid.get(pos) != Tile::Floor || labels[index] != WALL_SENTINEL {
            continue;
        }
        let label = next_label;
        next_label += 1;
        let region = flood_fill(grid, pos, label, &mut labels);
        regions.push(region);
    }

    RegionMap { labels, width: grid.width(), regions }
}

fn flood_fill(grid: &Grid, start: Pos, label: u32, labels: &mut [u32]) -> Region {
    let width = grid.width();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    labels[start.y as usize * width + start.x as usize] = label;

    let mut area = 0usize;
    let mut lo = start;
    let mut hi = start;

    while let Some(pos) = queue.pop_front() {
        area += 1;
        lo = Pos::new(lo.x.min(pos.x), lo.y.min(pos.y));
        hi = Pos::new(hi.x.max(pos.x), hi.y.max(pos.y));

        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let neighbor = pos.offset(dx, dy);
            if !grid.in_bounds(neighbor) || grid.get(neighbor) != Tile::Floor {
                continue;
            }
            let index = neighbor.y as usize * width + neighbor.x as usize;
            if labels[index] == WALL_SENTINEL {
                labels[index] = label;
                queue.push_back(neighbor);
            }
        }
    }

    Region { label, area, lo, hi }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_disjoint_rooms_get_distinct_labels() {
        let mut grid = Grid::new(7, 3);
        grid.set(Pos::new(1, 1), Tile::Floor);
        grid.set(Pos::new(5, 1), Tile::Floor);
        let map = detect(&grid);
        assert_eq!(map.regions.len(), 2);
        assert_ne!(map.label_at(Pos::new(1, 1)), map.label_at(Pos::new(5, 1)));
    }

    #[test]
    fn connected_tiles_share_one_label() {
        let mut grid = Grid::new(5, 5);
        for x in 1..4 {
            grid.set(Pos::new(x, 2), Tile::Floor);
        }
        let map = detect(&grid);
        assert_eq!(map.regions.len(), 1);
        assert_eq!(map.regions[0].area, 3);
    }

    #[test]
    fn all_wall_grid_has_no_regions() {
        let grid = Grid::new(4, 4);
        let map = detect(&grid);
        assert!(map.regions.is_empty());
    }
}
