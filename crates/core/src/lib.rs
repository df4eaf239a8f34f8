//! Public crate surface for the deterministic cave/platformer level generator.

pub mod config;
pub mod error;
pub mod grid;
pub mod mapgen;
pub mod model;
pub mod rng;
pub mod types;

pub use config::GenerationConfig;
pub use error::{ConfigError, GenerationError};
pub use mapgen::generate;
pub use model::Level;
