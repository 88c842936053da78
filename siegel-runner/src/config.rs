//! TOML run configuration.
//!
//! A config file names the instrument, where its prices and state live, and
//! optionally overrides any strategy parameter:
//!
//! ```toml
//! [run]
//! symbol = "000300.SS"
//! prices_path = "data/prices.csv"
//! state_path = "state/last_signal.json"
//!
//! [strategy.signals]
//! strong_signal = 0.8
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use siegel_core::StrategyConfig;
use thiserror::Error;

use crate::resample::ResampleMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid strategy parameters: {0}")]
    Strategy(#[from] siegel_core::ConfigError),

    #[error("config file {0} already exists")]
    AlreadyExists(PathBuf),
}

/// Full configuration for one scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub run: RunSection,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSection {
    /// Label carried into the report; not used for data lookup.
    pub symbol: String,
    /// CSV with `date,open,high,low,close[,volume]` rows.
    pub prices_path: PathBuf,
    /// JSON file holding the previous run's signal and position.
    pub state_path: PathBuf,
    #[serde(default)]
    pub resample: ResampleMode,
}

impl RunnerConfig {
    /// Parse and validate a TOML document. Paths are left as written.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(s)?;
        config.strategy.validate()?;
        Ok(config)
    }

    /// Load from a file, resolving relative paths against its directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.run.prices_path = resolve(base, &config.run.prices_path);
            config.run.state_path = resolve(base, &config.run.state_path);
        }
        Ok(config)
    }

    /// Deterministic hash of the strategy parameters.
    pub fn config_hash(&self) -> String {
        self.strategy.fingerprint()
    }

    /// Write the commented template to `path`, refusing to overwrite unless `force`.
    pub fn write_template(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, template()).map_err(io_err)
    }
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// A commented configuration with every parameter at its default.
pub fn template() -> &'static str {
    TEMPLATE
}

const TEMPLATE: &str = r#"# Weekly composite-signal configuration.
# Every [strategy.*] key is optional; omitted keys keep the values shown here.

[run]
symbol = "000300.SS"
prices_path = "data/prices.csv"
state_path = "state/last_signal.json"
# auto | always | never. "auto" resamples when the input looks daily.
resample = "auto"

[strategy.indicators]
ma_short = 20
ma_long = 45
slope_window = 4
rsi_period = 14
macd_fast = 12
macd_slow = 26
macd_signal = 9
adx_period = 14
atr_period = 14

# Must be non-negative and sum to 1.0.
[strategy.weights]
trend = 0.40
slope = 0.25
momentum = 0.20
environment = 0.15

[strategy.normalization]
trend_atr_units = 3.0
slope_full_scale = 0.04
macd_hist_atr_units = 0.25
rsi_mix = 0.5
adx_full_strength = 50.0
volatility_ceiling = 0.10
adx_mix = 0.6

[strategy.signals]
very_strong_signal = 0.90
strong_signal = 0.75
weak_signal = 0.65
signal_threshold = 0.50
sell_signal = -0.50
strong_sell_signal = -0.75

# Percent of the base allocation per band.
[strategy.signals.positions]
very_strong = 140.0
strong = 120.0
standard = 100.0
weak = 80.0
sell = 0.0
strong_sell = 0.0

[strategy.stop]
atr_multiplier = 2.5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config = RunnerConfig::from_toml_str(template()).unwrap();
        assert_eq!(config.strategy, StrategyConfig::default());
        assert_eq!(config.run.resample, ResampleMode::Auto);
        assert_eq!(config.run.symbol, "000300.SS");
    }

    #[test]
    fn minimal_config_uses_default_strategy() {
        let toml = r#"
            [run]
            symbol = "SPY"
            prices_path = "spy.csv"
            state_path = "state.json"
        "#;
        let config = RunnerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.strategy, StrategyConfig::default());
        assert_eq!(config.run.resample, ResampleMode::Auto);
    }

    #[test]
    fn partial_override() {
        let toml = r#"
            [run]
            symbol = "SPY"
            prices_path = "spy.csv"
            state_path = "state.json"
            resample = "never"

            [strategy.stop]
            atr_multiplier = 3.0
        "#;
        let config = RunnerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.strategy.stop.atr_multiplier, 3.0);
        assert_eq!(config.strategy.indicators.ma_long, 45);
        assert_eq!(config.run.resample, ResampleMode::Never);
    }

    #[test]
    fn invalid_strategy_rejected() {
        let toml = r#"
            [run]
            symbol = "SPY"
            prices_path = "spy.csv"
            state_path = "state.json"

            [strategy.weights]
            trend = 0.9
        "#;
        assert!(matches!(
            RunnerConfig::from_toml_str(toml),
            Err(ConfigError::Strategy(_))
        ));
    }

    #[test]
    fn missing_run_section_is_parse_error() {
        assert!(matches!(
            RunnerConfig::from_toml_str("[strategy.stop]\natr_multiplier = 2.0\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siegel.toml");
        RunnerConfig::write_template(&path, false).unwrap();

        let config = RunnerConfig::from_file(&path).unwrap();
        assert_eq!(config.run.prices_path, dir.path().join("data/prices.csv"));
        assert_eq!(config.run.state_path, dir.path().join("state/last_signal.json"));
    }

    #[test]
    fn write_template_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siegel.toml");
        std::fs::write(&path, "keep me").unwrap();

        assert!(matches!(
            RunnerConfig::write_template(&path, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        RunnerConfig::write_template(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[strategy.weights]"));
    }

    #[test]
    fn hash_tracks_strategy_changes() {
        let a = RunnerConfig::from_toml_str(template()).unwrap();
        let mut b = a.clone();
        assert_eq!(a.config_hash(), b.config_hash());
        b.strategy.stop.atr_multiplier = 3.0;
        assert_ne!(a.config_hash(), b.config_hash());
    }
}
