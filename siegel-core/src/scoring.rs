//! Composite scorer: four clamped sub-signals, weighted into one score in [-1, 1].
//!
//! Every sub-signal is normalized against volatility (ATR) or a configured
//! full-scale value, so the score is comparable across price levels.

use crate::config::{Normalization, ScoreWeights, StrategyConfig};
use crate::domain::SubSignals;
use crate::indicators::{IndicatorSet, IndicatorSnapshot};

/// Clamp to the signed unit interval.
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Distance of close from the long MA, in units of ATR.
pub fn trend_signal(close: f64, ma_long: f64, atr: f64, norm: &Normalization) -> f64 {
    if atr == 0.0 {
        return sign(close - ma_long);
    }
    clamp_unit((close - ma_long) / (norm.trend_atr_units * atr))
}

/// Short-MA percentage slope against its full-scale value.
pub fn slope_signal(ma_slope: f64, norm: &Normalization) -> f64 {
    clamp_unit(ma_slope / norm.slope_full_scale)
}

/// Blend of centred RSI and the ATR-scaled MACD histogram.
pub fn momentum_signal(rsi: f64, macd_histogram: f64, atr: f64, norm: &Normalization) -> f64 {
    let rsi_component = (rsi - 50.0) / 50.0;
    let macd_component = if atr == 0.0 {
        0.0
    } else {
        clamp_unit(macd_histogram / (norm.macd_hist_atr_units * atr))
    };
    clamp_unit(norm.rsi_mix * rsi_component + (1.0 - norm.rsi_mix) * macd_component)
}

/// Trend quality (ADX strength, low relative volatility) signed by the
/// dominant directional line.
pub fn environment_signal(
    adx: f64,
    plus_di: f64,
    minus_di: f64,
    atr: f64,
    close: f64,
    norm: &Normalization,
) -> f64 {
    let strength = (adx / norm.adx_full_strength).clamp(0.0, 1.0);
    let calm = (1.0 - (atr / close) / norm.volatility_ceiling).clamp(0.0, 1.0);
    let quality = norm.adx_mix * strength + (1.0 - norm.adx_mix) * calm;
    clamp_unit(sign(plus_di - minus_di) * quality)
}

/// All four sub-signals for one bar.
pub fn sub_signals(close: f64, ind: &IndicatorSnapshot, norm: &Normalization) -> SubSignals {
    SubSignals {
        trend: trend_signal(close, ind.ma_long, ind.atr, norm),
        slope: slope_signal(ind.ma_slope, norm),
        momentum: momentum_signal(ind.rsi, ind.macd_histogram, ind.atr, norm),
        environment: environment_signal(
            ind.adx,
            ind.plus_di,
            ind.minus_di,
            ind.atr,
            close,
            norm,
        ),
    }
}

/// Weighted sum of the sub-signals.
pub fn composite(signals: &SubSignals, weights: &ScoreWeights) -> f64 {
    let raw = weights.trend * signals.trend
        + weights.slope * signals.slope
        + weights.momentum * signals.momentum
        + weights.environment * signals.environment;
    // Weights sum to 1 within tolerance; absorb the rounding.
    clamp_unit(raw)
}

/// Score one bar. `None` while any indicator is still warming up.
pub fn score_bar(
    close: f64,
    indicators: &IndicatorSet,
    config: &StrategyConfig,
) -> Option<(f64, SubSignals, IndicatorSnapshot)> {
    let snapshot = indicators.complete()?;
    let subs = sub_signals(close, &snapshot, &config.normalization);
    Some((composite(&subs, &config.weights), subs, snapshot))
}
