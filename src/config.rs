use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// `level` when it is set.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    #[allow(unexpected_cfgs)]
    let env_filter = if cfg!(fuzzing) {
        EnvFilter::new("off")
    } else {
        env_filter
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt::layer().with_target(false).json()).try_init().ok();
    } else {
        registry.with(fmt::layer().with_target(false)).try_init().ok();
    }
}

/// Settings for `simulaterounds`. Every field is optional, so an empty file
/// is a valid configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// How many rounds to draw and simulate.
    pub rounds: u32,
    /// Seed for both the draw and the simulated results. If absent the OS
    /// random number generator is used.
    pub seed: Option<u64>,
    /// Overrides the panel size stored in the snapshot.
    pub judges_per_debate: Option<u32>,
    pub json_logs: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            seed: None,
            judges_per_debate: None,
            json_logs: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config: SimulationConfig = toml::from_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_config() {
        let config: SimulationConfig =
            toml::from_str("rounds = 8\nseed = 12\n").unwrap();
        assert_eq!(config.rounds, 8);
        assert_eq!(config.seed, Some(12));
        assert_eq!(config.judges_per_debate, None);
    }

    #[test]
    fn missing_file() {
        let err = SimulationConfig::load(Path::new("/nonexistent/sim.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
