//! Strategy configuration: indicator periods, score weights, normalization
//! scales, signal bands and the stop-loss multiplier.
//!
//! One immutable `StrategyConfig` value is passed into every core call. The
//! `Default` impls are the documented defaults; every section is
//! `#[serde(default)]`, so a partial TOML/JSON document only overrides what it
//! names.

use crate::indicators::{compute_warmup, Indicator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance for "weights sum to 1.0".
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid indicator period: {0}")]
    InvalidPeriod(String),

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("invalid normalization: {0}")]
    InvalidNormalization(String),

    #[error("invalid signal thresholds: {0}")]
    InvalidThresholds(String),

    #[error("invalid position sizes: {0}")]
    InvalidPositions(String),

    #[error("invalid stop-loss settings: {0}")]
    InvalidStop(String),
}

/// Complete, serializable strategy configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub indicators: IndicatorConfig,
    pub weights: ScoreWeights,
    pub normalization: Normalization,
    pub signals: SignalConfig,
    pub stop: StopConfig,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.weights.validate()?;
        self.normalization.validate()?;
        self.signals.validate()?;
        self.stop.validate()
    }

    /// Deterministic BLAKE3 fingerprint of the full configuration.
    ///
    /// Two runs with identical parameters share a fingerprint, so a consumer
    /// can tell a signal change caused by new prices from one caused by a
    /// configuration edit.
    pub fn fingerprint(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is canonical.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Lookback periods, in weekly bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ma_short: usize,
    pub ma_long: usize,
    /// Bars over which the short MA's percentage change is measured.
    pub slope_window: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub atr_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short: 20,
            ma_long: 45,
            slope_window: 4,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            atr_period: 14,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("ma_short", self.ma_short),
            ("ma_long", self.ma_long),
            ("slope_window", self.slope_window),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("adx_period", self.adx_period),
            ("atr_period", self.atr_period),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::InvalidPeriod(format!("{name} must be >= 1")));
            }
        }
        if self.ma_short >= self.ma_long {
            return Err(ConfigError::InvalidPeriod(format!(
                "ma_short ({}) must be shorter than ma_long ({})",
                self.ma_short, self.ma_long
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::InvalidPeriod(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }

    /// Index of the first bar at which every indicator is defined.
    ///
    /// A series needs `warmup() + 1` bars to produce one composite score.
    /// Call on a validated config only; see [`IndicatorConfig::build_all`].
    pub fn warmup(&self) -> usize {
        let indicators: Vec<Box<dyn Indicator>> = self.build_all();
        compute_warmup(&indicators)
    }

    /// Number of bars needed to score the last one.
    pub fn required_bars(&self) -> usize {
        self.warmup() + 1
    }
}

/// Sub-signal weights. Non-negative, summing to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub trend: f64,
    pub slope: f64,
    pub momentum: f64,
    pub environment: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trend: 0.40,
            slope: 0.25,
            momentum: 0.20,
            environment: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.trend + self.slope + self.momentum + self.environment
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [self.trend, self.slope, self.momentum, self.environment];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::InvalidWeights(
                "all weights must be finite and non-negative".into(),
            ));
        }
        let total = self.sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "weights must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }
}

/// Scales that bring raw indicator readings onto the common [-1, 1] range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    /// Distance above/below the long MA, in ATRs, that saturates the trend sub-signal.
    pub trend_atr_units: f64,
    /// Short-MA percentage change over `slope_window` that saturates the slope sub-signal.
    pub slope_full_scale: f64,
    /// MACD histogram, in ATRs, that saturates the MACD half of momentum.
    pub macd_hist_atr_units: f64,
    /// Share of RSI in the momentum sub-signal; the rest is MACD.
    pub rsi_mix: f64,
    /// ADX reading treated as full trend strength.
    pub adx_full_strength: f64,
    /// ATR/close ratio at which the volatility term reaches zero.
    pub volatility_ceiling: f64,
    /// Share of ADX in the environment quality; the rest is inverse volatility.
    pub adx_mix: f64,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            trend_atr_units: 3.0,
            slope_full_scale: 0.04,
            macd_hist_atr_units: 0.25,
            rsi_mix: 0.5,
            adx_full_strength: 50.0,
            volatility_ceiling: 0.10,
            adx_mix: 0.6,
        }
    }
}

impl Normalization {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scales = [
            ("trend_atr_units", self.trend_atr_units),
            ("slope_full_scale", self.slope_full_scale),
            ("macd_hist_atr_units", self.macd_hist_atr_units),
            ("adx_full_strength", self.adx_full_strength),
            ("volatility_ceiling", self.volatility_ceiling),
        ];
        for (name, value) in scales {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidNormalization(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in [("rsi_mix", self.rsi_mix), ("adx_mix", self.adx_mix)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidNormalization(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Score bands and the position attached to each band.
///
/// Bands are evaluated highest confidence first; see `mapper::map_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub very_strong_signal: f64,
    pub strong_signal: f64,
    pub weak_signal: f64,
    pub signal_threshold: f64,
    pub sell_signal: f64,
    pub strong_sell_signal: f64,
    pub positions: PositionSizes,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            very_strong_signal: 0.90,
            strong_signal: 0.75,
            weak_signal: 0.65,
            signal_threshold: 0.50,
            sell_signal: -0.50,
            strong_sell_signal: -0.75,
            positions: PositionSizes::default(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [
            ("very_strong_signal", self.very_strong_signal),
            ("strong_signal", self.strong_signal),
            ("weak_signal", self.weak_signal),
            ("signal_threshold", self.signal_threshold),
            ("sell_signal", self.sell_signal),
            ("strong_sell_signal", self.strong_sell_signal),
        ];
        if ordered.iter().any(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidThresholds(
                "thresholds must be finite".into(),
            ));
        }
        if self.very_strong_signal > 1.0 || self.strong_sell_signal < -1.0 {
            return Err(ConfigError::InvalidThresholds(
                "thresholds must lie within [-1, 1]".into(),
            ));
        }
        for pair in ordered.windows(2) {
            let (hi_name, hi) = pair[0];
            let (lo_name, lo) = pair[1];
            if hi < lo {
                return Err(ConfigError::InvalidThresholds(format!(
                    "{hi_name} ({hi}) must be >= {lo_name} ({lo})"
                )));
            }
        }
        if self.signal_threshold <= 0.0 || self.sell_signal >= 0.0 {
            return Err(ConfigError::InvalidThresholds(format!(
                "buy bands must start above 0 and sell bands below 0 (signal_threshold={}, sell_signal={})",
                self.signal_threshold, self.sell_signal
            )));
        }
        self.positions.validate()
    }
}

/// Position attached to each non-hold band, in percent of the base allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSizes {
    pub very_strong: f64,
    pub strong: f64,
    pub standard: f64,
    pub weak: f64,
    pub sell: f64,
    pub strong_sell: f64,
}

impl Default for PositionSizes {
    fn default() -> Self {
        Self {
            very_strong: 140.0,
            strong: 120.0,
            standard: 100.0,
            weak: 80.0,
            sell: 0.0,
            strong_sell: 0.0,
        }
    }
}

impl PositionSizes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [
            ("very_strong", self.very_strong),
            ("strong", self.strong),
            ("standard", self.standard),
            ("weak", self.weak),
            ("sell", self.sell),
            ("strong_sell", self.strong_sell),
        ];
        if ordered.iter().any(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::InvalidPositions(
                "positions must be finite and non-negative".into(),
            ));
        }
        for pair in ordered.windows(2) {
            let (hi_name, hi) = pair[0];
            let (lo_name, lo) = pair[1];
            if hi < lo {
                return Err(ConfigError::InvalidPositions(format!(
                    "{hi_name} ({hi}) must be >= {lo_name} ({lo})"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopConfig {
    pub atr_multiplier: f64,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: 2.5,
        }
    }
}

impl StopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.atr_multiplier.is_finite() && self.atr_multiplier >= 0.0) {
            return Err(ConfigError::InvalidStop(format!(
                "atr_multiplier must be a non-negative number, got {}",
                self.atr_multiplier
            )));
        }
        Ok(())
    }
}
