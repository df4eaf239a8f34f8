//! Output data model: the entities a completed `generate()` call emits.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{PlacementType, PlatformKind, Pos};

/// A maximal 4-connected run of floor tiles, as produced by the region detector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub label: u32,
    pub area: usize,
    pub lo: Pos,
    pub hi: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformDirection {
    Left,
    Right,
}

impl PlatformDirection {
    pub const fn dx(self) -> i32 {
        match self {
            PlatformDirection::Left => -1,
            PlatformDirection::Right => 1,
        }
    }
}

/// A placed platform. Height is always 1 tile; width tiles extend from
/// `(x, y)` in `direction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub direction: PlatformDirection,
}

impl Platform {
    /// The `width` contiguous tiles this platform occupies.
    pub fn occupied_tiles(&self) -> Vec<Pos> {
        let dx = self.direction.dx();
        (0..self.width as i32).map(|i| Pos::new(self.x + i * dx, self.y)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyDirection {
    Forward,
    Backward,
}

impl EnemyDirection {
    pub const fn sign(self) -> i32 {
        match self {
            EnemyDirection::Forward => 1,
            EnemyDirection::Backward => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub patrol_distance: f64,
    pub direction: EnemyDirection,
    pub speed: f64,
    pub placement_type: PlacementType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfigSummary {
    pub width: u32,
    pub height: u32,
    pub seed: String,
}

/// A complete, populated level: the output of one `generate()` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    pub grid: Vec<u8>,
    pub start_pos: Pos,
    pub goal_pos: Pos,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub platforms: Vec<Platform>,
    pub config: LevelConfigSummary,
}

impl Level {
    /// A byte string stable under serialization format changes, used to
    /// pin determinism in regression tests (I7).
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.grid);
        bytes.extend_from_slice(&self.start_pos.x.to_le_bytes());
        bytes.extend_from_slice(&self.start_pos.y.to_le_bytes());
        bytes.extend_from_slice(&self.goal_pos.x.to_le_bytes());
        bytes.extend_from_slice(&self.goal_pos.y.to_le_bytes());
        for coin in &self.coins {
            bytes.extend_from_slice(&coin.x.to_le_bytes());
            bytes.extend_from_slice(&coin.y.to_le_bytes());
        }
        for enemy in &self.enemies {
            bytes.extend_from_slice(&enemy.x.to_le_bytes());
            bytes.extend_from_slice(&enemy.y.to_le_bytes());
        }
        for platform in &self.platforms {
            bytes.extend_from_slice(&platform.x.to_le_bytes());
            bytes.extend_from_slice(&platform.y.to_le_bytes());
            bytes.extend_from_slice(&platform.width.to_le_bytes());
        }
        bytes
    }

    /// A stable 64-bit fingerprint of [`Self::canonical_bytes`].
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_occupied_tiles_extend_in_direction() {
        let platform = Platform {
            kind: PlatformKind::Floating,
            x: 10,
            y: 5,
            width: 3,
            direction: PlatformDirection::Right,
        };
        assert_eq!(
            platform.occupied_tiles(),
            vec![Pos::new(10, 5), Pos::new(11, 5), Pos::new(12, 5)]
        );
    }

    #[test]
    fn platform_occupied_tiles_extend_left() {
        let platform = Platform {
            kind: PlatformKind::Moving,
            x: 10,
            y: 5,
            width: 3,
            direction: PlatformDirection::Left,
        };
        assert_eq!(
            platform.occupied_tiles(),
            vec![Pos::new(10, 5), Pos::new(9, 5), Pos::new(8, 5)]
        );
    }

    #[test]
    fn fingerprint_is_stable_across_equal_levels() {
        let level = Level {
            width: 4,
            height: 4,
            grid: vec![0; 16],
            start_pos: Pos::new(1, 1),
            goal_pos: Pos::new(2, 2),
            coins: vec![],
            enemies: vec![],
            platforms: vec![],
            config: LevelConfigSummary { width: 4, height: 4, seed: "abc".into() },
        };
        assert_eq!(level.fingerprint(), level.clone().fingerprint());
    }
}
