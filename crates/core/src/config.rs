//! Validated generation configuration.
//!
//! Mirrors the duck-typed option bags the original generator accepted
//! with one explicit, validated value: [`GenerationConfig`] plus a
//! handful of per-component override structs. Validation happens once,
//! at [`GenerationConfig::validate`]; everything downstream treats the
//! config as immutable.

use crate::error::ConfigError;

/// Which seeding strategy fills the initial grid (§4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeederStrategy {
    /// Each tile independently wall with probability `initial_wall_ratio`.
    Uniform,
    /// "Main point" anchors joined by carved corridors.
    GraphBased,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPlacerConfig {
    /// Cardinal safety radius a spawn must see an unobstructed floor tile within.
    pub safety_radius: u32,
    /// Restricts the initial spawn search to `x < floor(width * boundary)`.
    pub left_side_boundary: f64,
}

impl Default for SpawnPlacerConfig {
    fn default() -> Self {
        Self { safety_radius: 2, left_side_boundary: 0.25 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlatformPlacerConfig {
    pub target_reachability: f64,
    pub max_iterations: u32,
    pub min_size: u32,
    pub max_size: u32,
    /// Half-width of the scoring window around a critical-ring candidate.
    pub score_window: u32,
    /// Probability a sampled platform is `Floating` rather than `Moving`.
    pub floating_probability: f64,
    /// Half-width of the forbidden-tile window around spawn/main points/coins.
    pub forbidden_window: u32,
}

impl Default for PlatformPlacerConfig {
    fn default() -> Self {
        Self {
            target_reachability: 0.85,
            max_iterations: 200,
            min_size: 2,
            max_size: 6,
            score_window: 7,
            floating_probability: 0.5,
            forbidden_window: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GoalPlacerConfig {
    pub min_start_goal_distance: f64,
    pub right_side_boundary: Option<f64>,
}

impl Default for GoalPlacerConfig {
    fn default() -> Self {
        Self { min_start_goal_distance: 40.0, right_side_boundary: Some(0.5) }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoinPlacerConfig {
    pub coin_count: u32,
    pub min_distance: f64,
    /// Reachable-fraction floor below which coin placement refuses to run (§4.13 step 2).
    pub min_reachable_fraction: f64,
    /// Fraction of `coin_count` drawn from dead-end tiles.
    pub dead_end_weight: f64,
    /// Fraction of `coin_count` drawn from exploration-area tiles.
    pub exploration_weight: f64,
}

impl Default for CoinPlacerConfig {
    fn default() -> Self {
        Self {
            coin_count: 15,
            min_distance: 5.0,
            min_reachable_fraction: 0.60,
            dead_end_weight: 0.3,
            exploration_weight: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyPlacerConfig {
    pub enemy_count: u32,
    pub enemy_density: f64,
    pub min_patrol_area: u32,
    pub max_patrol_area: u32,
    pub strategic_distance: f64,
    pub goal_strategic_distance: f64,
    pub min_distance_from_spawn: f64,
    pub min_distance_from_goal: f64,
    pub preserve_solvability: bool,
}

impl Default for EnemyPlacerConfig {
    fn default() -> Self {
        Self {
            enemy_count: 5,
            enemy_density: 0.02,
            min_patrol_area: 5,
            max_patrol_area: 20,
            strategic_distance: 5.0,
            goal_strategic_distance: 8.0,
            min_distance_from_spawn: 8.0,
            min_distance_from_goal: 5.0,
            preserve_solvability: true,
        }
    }
}

/// The full, validated configuration for one `generate()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    pub seed: String,
    pub width: u32,
    pub height: u32,
    pub initial_wall_ratio: f64,
    pub simulation_steps: u32,
    pub birth_threshold: u32,
    pub survival_threshold: u32,
    pub min_room_size: u32,
    pub seeder_strategy: SeederStrategy,
    pub spawn: SpawnPlacerConfig,
    pub platform: PlatformPlacerConfig,
    pub goal: GoalPlacerConfig,
    pub coin: CoinPlacerConfig,
    pub enemy: EnemyPlacerConfig,
}

impl GenerationConfig {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            width: 100,
            height: 60,
            initial_wall_ratio: 0.45,
            simulation_steps: 4,
            birth_threshold: 5,
            survival_threshold: 4,
            min_room_size: 50,
            seeder_strategy: SeederStrategy::GraphBased,
            spawn: SpawnPlacerConfig::default(),
            platform: PlatformPlacerConfig::default(),
            goal: GoalPlacerConfig::default(),
            coin: CoinPlacerConfig::default(),
            enemy: EnemyPlacerConfig::default(),
        }
    }

    /// Validates every range in §6, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed.is_empty() {
            return Err(config_error(
                "seed must not be empty",
                "seed",
                &self.seed,
                "supply any non-empty string",
            ));
        }
        check_range(self.width, 50, 200, "width")?;
        check_range(self.height, 30, 120, "height")?;
        check_range_f64(self.initial_wall_ratio, 0.40, 0.55, "initial_wall_ratio")?;
        check_range(self.simulation_steps, 3, 6, "simulation_steps")?;
        check_range(self.birth_threshold, 4, 6, "birth_threshold")?;
        check_range(self.survival_threshold, 2, 4, "survival_threshold")?;
        check_range(self.min_room_size, 20, 100, "min_room_size")?;
        check_range_f64(self.goal.min_start_goal_distance, 30.0, 100.0, "min_start_goal_distance")?;
        check_range(self.coin.coin_count, 10, 30, "coin_count")?;
        check_range(self.enemy.enemy_count, 3, 10, "enemy_count")?;

        let bucket_sum = self.coin.dead_end_weight + self.coin.exploration_weight;
        if !(0.0..=1.0).contains(&bucket_sum) {
            return Err(config_error(
                "coin bucket weights must sum to at most 1.0",
                "coin.dead_end_weight + coin.exploration_weight",
                &bucket_sum.to_string(),
                "reduce dead_end_weight or exploration_weight so they sum to <= 1.0",
            ));
        }
        if self.platform.min_size == 0 || self.platform.min_size > self.platform.max_size {
            return Err(config_error(
                "platform.min_size must be positive and no greater than max_size",
                "platform.min_size",
                &self.platform.min_size.to_string(),
                "choose 1 <= min_size <= max_size",
            ));
        }
        Ok(())
    }
}

fn check_range(value: u32, lo: u32, hi: u32, parameter: &str) -> Result<(), ConfigError> {
    if value < lo || value > hi {
        return Err(config_error(
            &format!("{parameter} must be between {lo} and {hi}"),
            parameter,
            &value.to_string(),
            &format!("choose a value in [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

fn check_range_f64(value: f64, lo: f64, hi: f64, parameter: &str) -> Result<(), ConfigError> {
    if value < lo || value > hi {
        return Err(config_error(
            &format!("{parameter} must be between {lo} and {hi}"),
            parameter,
            &value.to_string(),
            &format!("choose a value in [{lo}, {hi}]"),
        ));
    }
    Ok(())
}

fn config_error(message: &str, parameter: &str, value: &str, suggestion: &str) -> ConfigError {
    ConfigError {
        message: message.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        suggestion: suggestion.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GenerationConfig::new("abc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn width_out_of_range_is_rejected() {
        let mut config = GenerationConfig::new("abc");
        config.width = 10;
        let error = config.validate().unwrap_err();
        assert_eq!(error.parameter, "width");
    }

    #[test]
    fn empty_seed_is_rejected() {
        let config = GenerationConfig::new("");
        let error = config.validate().unwrap_err();
        assert_eq!(error.parameter, "seed");
    }

    #[test]
    fn oversized_coin_bucket_weights_are_rejected() {
        let mut config = GenerationConfig::new("abc");
        config.coin.dead_end_weight = 0.7;
        config.coin.exploration_weight = 0.6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_platform_size_range_is_rejected() {
        let mut config = GenerationConfig::new("abc");
        config.platform.min_size = 6;
        config.platform.max_size = 2;
        assert!(config.validate().is_err());
    }
}
