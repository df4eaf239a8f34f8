//! Shared value types used across the generation pipeline.

use serde::{Deserialize, Serialize};

/// An integer tile coordinate. `y` grows downward (screen coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn euclidean(self, other: Pos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: i32, dy: i32) -> Pos {
        Pos { x: self.x + dx, y: self.y + dy }
    }
}

/// A single tile's occupancy. `0 = Floor`, `1 = Wall` in the on-wire
/// byte encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Floor,
    Wall,
}

impl Tile {
    pub const fn as_byte(self) -> u8 {
        match self {
            Tile::Floor => 0,
            Tile::Wall => 1,
        }
    }

    pub const fn from_byte(byte: u8) -> Tile {
        if byte == 0 { Tile::Floor } else { Tile::Wall }
    }

    pub const fn is_floor(self) -> bool {
        matches!(self, Tile::Floor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Floating,
    Moving,
}

/// Tags the generator mechanism that produced an enemy's position, so
/// downstream consumers can reason about why an enemy ended up where it
/// did without re-deriving it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementType {
    ChokePoint,
    Strategic,
    Patrol,
    Platform(PlatformKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_byte_roundtrip() {
        assert_eq!(Tile::from_byte(Tile::Floor.as_byte()), Tile::Floor);
        assert_eq!(Tile::from_byte(Tile::Wall.as_byte()), Tile::Wall);
    }

    #[test]
    fn manhattan_and_euclidean_agree_on_axis_aligned_points() {
        let a = Pos::new(2, 2);
        let b = Pos::new(2, 7);
        assert_eq!(a.manhattan(b), 5);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-9);
    }
}
