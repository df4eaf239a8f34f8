//! Fixed-shape tile grid with safe, out-of-bounds-as-wall accessors.

use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a `width x height` grid, every tile a wall.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero — a zero-area grid is a
    /// programmer error (precondition fault), not a recoverable one.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self { width, height, tiles: vec![Tile::Wall; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> usize {
        debug_assert!(self.in_bounds(pos), "tile index requested out of bounds: {pos:?}");
        (pos.y as usize) * self.width + (pos.x as usize)
    }

    /// Out-of-bounds positions read as `Wall`, matching the convention
    /// used throughout the physics analyzer: the grid boundary behaves
    /// like solid rock.
    pub fn get(&self, pos: Pos) -> Tile {
        if !self.in_bounds(pos) { Tile::Wall } else { self.tiles[self.index(pos)] }
    }

    /// Writes a tile. Out-of-bounds writes are a precondition fault.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        let index = self.index(pos);
        self.tiles[index] = tile;
    }

    pub fn close_border(&mut self) {
        for x in 0..self.width {
            self.set(Pos::new(x as i32, 0), Tile::Wall);
            self.set(Pos::new(x as i32, self.height as i32 - 1), Tile::Wall);
        }
        for y in 0..self.height {
            self.set(Pos::new(0, y as i32), Tile::Wall);
            self.set(Pos::new(self.width as i32 - 1, y as i32), Tile::Wall);
        }
    }

    /// Every in-bounds position, `y` outer, `x` inner — the pipeline's
    /// canonical scan order, used wherever determinism depends on
    /// enumeration order (region labeling, candidate scans, ...).
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Pos::new(x as i32, y as i32)))
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_floor()).count()
    }

    pub fn wall_count(&self) -> usize {
        self.tiles.len() - self.floor_count()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.tiles.iter().map(|tile| tile.as_byte()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_wall() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.wall_count(), 20);
        assert_eq!(grid.floor_count(), 0);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.get(Pos::new(-1, 0)), Tile::Wall);
        assert_eq!(grid.get(Pos::new(3, 0)), Tile::Wall);
        assert_eq!(grid.get(Pos::new(0, 3)), Tile::Wall);
    }

    #[test]
    fn close_border_forces_edge_tiles_to_wall() {
        let mut grid = Grid::new(4, 4);
        for pos in grid.positions() {
            grid.set(pos, Tile::Floor);
        }
        grid.close_border();
        for x in 0..4 {
            assert_eq!(grid.get(Pos::new(x, 0)), Tile::Wall);
            assert_eq!(grid.get(Pos::new(x, 3)), Tile::Wall);
        }
        for y in 0..4 {
            assert_eq!(grid.get(Pos::new(0, y)), Tile::Wall);
            assert_eq!(grid.get(Pos::new(3, y)), Tile::Wall);
        }
        assert_eq!(grid.get(Pos::new(1, 1)), Tile::Floor);
    }

    #[test]
    fn positions_scan_y_outer_x_inner() {
        let grid = Grid::new(2, 2);
        let scanned: Vec<Pos> = grid.positions().collect();
        assert_eq!(
            scanned,
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]
        );
    }
}
