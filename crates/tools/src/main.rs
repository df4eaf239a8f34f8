//! `generate` — CLI wrapper around the `core` level generator.
//!
//! Validates flags into a `GenerationConfig`, calls `generate()`, and
//! serializes the resulting `Level` to JSON (stdout, or `--output`).
//! CLI flag formatting and JSON field names are explicitly out of
//! scope for `core` (spec §1) — this binary owns both.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::config::{GenerationConfig, SeederStrategy};
use game_core::mapgen::generate;

#[derive(Parser)]
#[command(author, version, about = "Generate a deterministic cave/platformer level", long_about = None)]
struct Args {
    /// Seed string. Identical seed + flags always produce the same level.
    #[arg(short, long)]
    seed: String,

    #[arg(long, default_value_t = 100)]
    width: u32,
    #[arg(long, default_value_t = 60)]
    height: u32,
    #[arg(long, default_value_t = 0.45)]
    initial_wall_ratio: f64,
    #[arg(long, default_value_t = 4)]
    simulation_steps: u32,
    #[arg(long, default_value_t = 5)]
    birth_threshold: u32,
    #[arg(long, default_value_t = 4)]
    survival_threshold: u32,
    #[arg(long, default_value_t = 50)]
    min_room_size: u32,
    #[arg(long, default_value_t = 40.0)]
    min_start_goal_distance: f64,
    #[arg(long, default_value_t = 15)]
    coin_count: u32,
    #[arg(long, default_value_t = 5)]
    enemy_count: u32,

    /// Write the generated level's JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    /// Print per-phase entity counts to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> GenerationConfig {
        let mut config = GenerationConfig::new(self.seed);
        config.width = self.width;
        config.height = self.height;
        config.initial_wall_ratio = self.initial_wall_ratio;
        config.simulation_steps = self.simulation_steps;
        config.birth_threshold = self.birth_threshold;
        config.survival_threshold = self.survival_threshold;
        config.min_room_size = self.min_room_size;
        config.seeder_strategy = SeederStrategy::GraphBased;
        config.goal.min_start_goal_distance = self.min_start_goal_distance;
        config.coin.coin_count = self.coin_count;
        config.enemy.enemy_count = self.enemy_count;
        config
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let output = args.output.clone();
    let verbose = args.verbose;
    let config = args.into_config();

    config.validate().map_err(|error| anyhow::anyhow!("{error}"))?;

    let level = generate(&config).map_err(|error| anyhow::anyhow!("{error}"))?;

    if verbose {
        eprintln!(
            "level {}x{}: {} platforms, {} coins, {} enemies, spawn={:?}, goal={:?}",
            level.width,
            level.height,
            level.platforms.len(),
            level.coins.len(),
            level.enemies.len(),
            level.start_pos,
            level.goal_pos,
        );
    }

    let json = serde_json::to_string_pretty(&level).context("failed to serialize level to JSON")?;
    match output {
        Some(path) => fs::write(&path, json).with_context(|| format!("failed to write output file: {path}"))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
