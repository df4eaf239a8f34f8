//! Error types surfaced across the configuration boundary and from
//! degenerate-cave faults. Precondition faults (corrupt grids,
//! out-of-bounds queries) are programmer errors and panic instead of
//! flowing through these types — see spec §7.

use std::fmt;

/// A single configuration parameter violation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigError {
    pub message: String,
    pub parameter: String,
    pub value: String,
    pub suggestion: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (parameter={}, value={}, suggestion={})",
            self.message, self.parameter, self.value, self.suggestion
        )
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error returned by `generate`.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationError {
    /// A configuration parameter fell outside its validated range.
    Config(ConfigError),
    /// The pipeline could not produce a traversable, populated level
    /// from this seed/config (no valid spawn or goal, or reachable
    /// fraction too low for safe coin placement). Callers should
    /// retry with a different seed.
    DegenerateCave { message: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Config(error) => write!(f, "configuration error: {error}"),
            GenerationError::DegenerateCave { message } => {
                write!(f, "degenerate cave: {message}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<ConfigError> for GenerationError {
    fn from(error: ConfigError) -> Self {
        GenerationError::Config(error)
    }
}
