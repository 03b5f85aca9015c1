//! Configuration system for SeatForge.
//!
//! Load planner configuration from TOML or YAML files to control the
//! termination budget, the acceptor and the move mix without code changes.
//! Values carried by an individual request (`maxIterations`, `timeBudgetMs`,
//! `seed`) take precedence over the configured ones.
//!
//! # Examples
//!
//! ```
//! use seatforge_config::{AcceptorConfig, PlannerConfig};
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     time_budget_ms = 250
//!
//!     [acceptor]
//!     type = "hill_climbing"
//! "#).unwrap();
//!
//! assert_eq!(config.seed(), 7);
//! assert_eq!(config.termination.time_budget(), Duration::from_millis(250));
//! assert_eq!(config.termination.max_iterations, 3000);
//! assert!(matches!(config.acceptor, AcceptorConfig::HillClimbing));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use seatforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use seatforge_core::request::{DEFAULT_MAX_ITERATIONS, DEFAULT_TIME_BUDGET_MS};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Seed used when neither the request nor the configuration carries one.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    #[serde(default)]
    pub termination: TerminationConfig,

    #[serde(default)]
    pub acceptor: AcceptorConfig,

    #[serde(default)]
    pub moves: MoveConfig,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML or
    /// holds out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a file, picking the format by extension
    /// (`.yaml`/`.yml` for YAML, anything else for TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.termination.poll_interval == 0 {
            return Err(ConfigError::Invalid(
                "termination.poll_interval must be at least 1".into(),
            ));
        }
        if self.termination.stale_sweep_after == 0 {
            return Err(ConfigError::Invalid(
                "termination.stale_sweep_after must be at least 1".into(),
            ));
        }
        if let AcceptorConfig::SimulatedAnnealing(sa) = &self.acceptor {
            if !(sa.starting_temperature.is_finite() && sa.starting_temperature > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "acceptor.starting_temperature must be positive, got {}",
                    sa.starting_temperature
                )));
            }
            if !(sa.decay_rate > 0.0 && sa.decay_rate <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "acceptor.decay_rate must be in (0, 1], got {}",
                    sa.decay_rate
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.moves.swap_probability) {
            return Err(ConfigError::Invalid(format!(
                "moves.swap_probability must be in [0, 1], got {}",
                self.moves.swap_probability
            )));
        }
        Ok(())
    }

    /// Seed to use when the request carries none.
    pub fn seed(&self) -> u64 {
        self.random_seed.unwrap_or(DEFAULT_RANDOM_SEED)
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.termination.max_iterations = max_iterations;
        self
    }

    pub fn with_time_budget_ms(mut self, time_budget_ms: u64) -> Self {
        self.termination.time_budget_ms = time_budget_ms;
        self
    }

    pub fn with_acceptor(mut self, acceptor: AcceptorConfig) -> Self {
        self.acceptor = acceptor;
        self
    }
}

/// Budget of one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminationConfig {
    pub max_iterations: u64,

    pub time_budget_ms: u64,

    /// Iterations between two wall-clock and cancellation checks.
    pub poll_interval: u64,

    /// Iterations without a new best before a full neighbor sweep decides
    /// whether the search has converged.
    pub stale_sweep_after: u64,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            poll_interval: 64,
            stale_sweep_after: 256,
        }
    }
}

impl TerminationConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Acceptor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AcceptorConfig {
    /// Only accept moves that improve the score.
    HillClimbing,

    /// Accept worsening soft moves with a decaying probability.
    SimulatedAnnealing(SimulatedAnnealingConfig),
}

impl Default for AcceptorConfig {
    fn default() -> Self {
        AcceptorConfig::SimulatedAnnealing(SimulatedAnnealingConfig::default())
    }
}

/// Simulated annealing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulatedAnnealingConfig {
    /// Temperature on the soft scale (`0..1`) at the first iteration.
    pub starting_temperature: f64,

    /// Multiplier applied to the temperature after every iteration.
    pub decay_rate: f64,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            starting_temperature: 0.1,
            decay_rate: 0.998,
        }
    }
}

/// Move selection configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MoveConfig {
    /// Probability of sampling a swap rather than a relocation.
    pub swap_probability: f64,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            swap_probability: 0.5,
        }
    }
}
