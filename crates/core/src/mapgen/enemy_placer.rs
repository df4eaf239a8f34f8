//! Enemy candidate generation and zone-balanced placement (§4.14–4.15).
//!
//! [`analyze`] is the `EnemyPlacementAnalyzer`: it produces tagged
//! candidate tiles from four independent generators. [`place`] is the
//! `StrategicEnemyPlacer`: it priority-sorts those candidates, buckets
//! them into left/middle/right zones, and round-robins through the
//! zones until the target enemy count is reached.

use std::collections::HashSet;

use crate::config::EnemyPlacerConfig;
use crate::grid::Grid;
use crate::model::{Coin, Enemy, EnemyDirection, Platform};
use crate::rng::SeededRng;
use crate::types::{PlacementType, Pos, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyCandidate {
    pub pos: Pos,
    pub placement_type: PlacementType,
}

/// Per-bucket candidate counts, reported alongside the candidate list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CandidateStats {
    pub choke_points: usize,
    pub patrol: usize,
    pub strategic: usize,
    pub platform: usize,
}

/// A floor tile with wall directly above *and* below: a single-tile
/// vertical squeeze a patrolling enemy must funnel through.
fn choke_points(grid: &Grid) -> Vec<Pos> {
    grid.positions()
        .filter(|&pos| {
            grid.get(pos) == Tile::Floor
                && grid.get(pos.offset(0, -1)) == Tile::Wall
                && grid.get(pos.offset(0, 1)) == Tile::Wall
        })
        .collect()
}

/// Contiguous horizontal runs of grounded floor tiles whose length
/// falls in `[min_len, max_len]`; each run contributes its center tile.
fn patrol_run_centers(grid: &Grid, min_len: u32, max_len: u32) -> Vec<Pos> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut centers = Vec::new();

    for y in 0..height {
        let mut run_start: Option<i32> = None;
        for x in 0..=width {
            let grounded = x < width && {
                let pos = Pos::new(x, y);
                grid.get(pos) == Tile::Floor && grid.get(pos.offset(0, 1)) == Tile::Wall
            };
            match (grounded, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    let len = (x - start) as u32;
                    if len >= min_len && len <= max_len {
                        centers.push(Pos::new(start + (x - start) / 2, y));
                    }
                    run_start = None;
                }
                _ => {}
            }
        }
    }
    centers
}

/// Floor tiles within `strategic_distance` of any coin and within
/// `goal_strategic_distance` of the goal.
fn strategic_positions(
    grid: &Grid,
    coins: &[Coin],
    goal: Pos,
    strategic_distance: f64,
    goal_strategic_distance: f64,
) -> Vec<Pos> {
    grid.positions()
        .filter(|&pos| grid.get(pos) == Tile::Floor)
        .filter(|&pos| pos.euclidean(goal) <= goal_strategic_distance)
        .filter(|&pos| coins.iter().any(|coin| Pos::new(coin.x, coin.y).euclidean(pos) <= strategic_distance))
        .collect()
}

/// Floor tiles standing directly on top of a placed platform's
/// occupied (wall) tiles, tagged with that platform's kind.
fn platform_positions(grid: &Grid, platforms: &[Platform]) -> Vec<(Pos, crate::types::PlatformKind)> {
    let mut out = Vec::new();
    for platform in platforms {
        for tile in platform.occupied_tiles() {
            let above = tile.offset(0, -1);
            if grid.in_bounds(above) && grid.get(above) == Tile::Floor {
                out.push((above, platform.kind));
            }
        }
    }
    out
}

/// Runs all four candidate generators. The accessibility filter from
/// §4.14 ("drops any candidate not floor or out of bounds") is
/// satisfied by construction: every generator above only emits
/// in-bounds floor tiles.
pub fn analyze(
    grid: &Grid,
    coins: &[Coin],
    goal: Pos,
    platforms: &[Platform],
    config: &EnemyPlacerConfig,
) -> (Vec<EnemyCandidate>, CandidateStats) {
    let choke = choke_points(grid);
    let patrol = patrol_run_centers(grid, config.min_patrol_area, config.max_patrol_area);
    let strategic =
        strategic_positions(grid, coins, goal, config.strategic_distance, config.goal_strategic_distance);
    let platform = platform_positions(grid, platforms);

    let stats = CandidateStats {
        choke_points: choke.len(),
        patrol: patrol.len(),
        strategic: strategic.len(),
        platform: platform.len(),
    };

    let mut candidates = Vec::with_capacity(choke.len() + patrol.len() + strategic.len() + platform.len());
    candidates.extend(choke.into_iter().map(|pos| EnemyCandidate { pos, placement_type: PlacementType::ChokePoint }));
    candidates
        .extend(strategic.into_iter().map(|pos| EnemyCandidate { pos, placement_type: PlacementType::Strategic }));
    candidates.extend(patrol.into_iter().map(|pos| EnemyCandidate { pos, placement_type: PlacementType::Patrol }));
    candidates.extend(
        platform
            .into_iter()
            .map(|(pos, kind)| EnemyCandidate { pos, placement_type: PlacementType::Platform(kind) }),
    );

    (candidates, stats)
}

fn placement_priority(placement_type: PlacementType) -> u8 {
    match placement_type {
        PlacementType::ChokePoint => 0,
        PlacementType::Strategic => 1,
        PlacementType::Patrol => 2,
        PlacementType::Platform(_) => 3,
    }
}

fn zone_index(pos: Pos, width: usize) -> u8 {
    let third = width as f64 / 3.0;
    if (pos.x as f64) < third {
        0
    } else if (pos.x as f64) < 2.0 * third {
        1
    } else {
        2
    }
}

/// The secondary priority-sort zone score from §4.15 step 3: `x`
/// relative to `max(goal.x, spawn.x)`, distinct from step 4's
/// width-thirds partition (`zone_index`) used for the round-robin.
fn priority_zone_score(pos: Pos, spawn: Pos, goal: Pos) -> i64 {
    let reference = spawn.x.max(goal.x).max(1);
    (pos.x as i64 * 3) / reference as i64
}

/// A tie-break key that spreads within-zone ties across the zone
/// instead of clustering at one edge, without depending on distance
/// from spawn (which would reproduce the naive rule this replaces).
fn spread_key(pos: Pos, width: usize) -> usize {
    ((pos.y as usize) * width + pos.x as usize).reverse_bits()
}

fn inside_spawn_goal_box(pos: Pos, spawn: Pos, goal: Pos) -> bool {
    let lo_x = spawn.x.min(goal.x);
    let hi_x = spawn.x.max(goal.x);
    let lo_y = spawn.y.min(goal.y);
    let hi_y = spawn.y.max(goal.y);
    (lo_x..=hi_x).contains(&pos.x) && (lo_y..=hi_y).contains(&pos.y)
}

/// Priority-sorts candidates (chokePoint > strategic > patrol >
/// platform, then zone, then a within-zone spread key), partitions them
/// into left/middle/right zones, and round-robins through the zones
/// until `target` enemies are placed or every zone is exhausted.
pub fn place(
    grid: &Grid,
    spawn: Pos,
    goal: Pos,
    coins: &[Coin],
    platforms: &[Platform],
    config: &EnemyPlacerConfig,
    rng: &mut SeededRng,
) -> Vec<Enemy> {
    let (mut candidates, _stats) = analyze(grid, coins, goal, platforms, config);
    if candidates.is_empty() {
        return Vec::new();
    }

    let width = grid.width();
    candidates.sort_by(|a, b| {
        placement_priority(a.placement_type)
            .cmp(&placement_priority(b.placement_type))
            .then(priority_zone_score(a.pos, spawn, goal).cmp(&priority_zone_score(b.pos, spawn, goal)))
            .then(spread_key(a.pos, width).cmp(&spread_key(b.pos, width)))
    });

    let mut zones: [std::collections::VecDeque<EnemyCandidate>; 3] = Default::default();
    for candidate in candidates {
        zones[zone_index(candidate.pos, width) as usize].push_back(candidate);
    }

    let area = (grid.width() * grid.height()) as f64;
    let target = (config.enemy_count as usize).min((area * config.enemy_density).floor() as usize);

    let mut used: HashSet<Pos> = HashSet::new();
    let mut enemies = Vec::new();
    let mut zone_cursor = 0usize;
    let mut empty_streak = 0usize;

    while enemies.len() < target && empty_streak < 3 {
        let zone = &mut zones[zone_cursor];
        let mut placed_this_zone = false;

        while let Some(candidate) = zone.pop_front() {
            if used.contains(&candidate.pos) {
                continue;
            }
            if candidate.pos.euclidean(spawn) < config.min_distance_from_spawn {
                continue;
            }
            if candidate.pos.euclidean(goal) < config.min_distance_from_goal {
                continue;
            }
            if config.preserve_solvability
                && candidate.placement_type == PlacementType::ChokePoint
                && inside_spawn_goal_box(candidate.pos, spawn, goal)
            {
                continue;
            }

            used.insert(candidate.pos);
            enemies.push(Enemy {
                x: candidate.pos.x,
                y: candidate.pos.y,
                patrol_distance: rng.random_int(50, 499) as f64,
                direction: if rng.chance(0.5) { EnemyDirection::Forward } else { EnemyDirection::Backward },
                speed: rng.random_int(10, 199) as f64,
                placement_type: candidate.placement_type,
            });
            placed_this_zone = true;
            break;
        }

        empty_streak = if placed_this_zone { 0 } else { empty_streak + 1 };
        zone_cursor = (zone_cursor + 1) % 3;
    }

    enemies
}
