//! Signal engine: validates the weekly series, runs the indicator suite,
//! scores every bar and maps the latest one to a band and stop level.
//!
//! The engine is a pure batch computation over `&[Bar]`; it does no I/O and
//! holds no state between calls beyond its immutable configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, StrategyConfig};
use crate::domain::{Bar, SubSignals, MIN_WEEKLY_SPACING_DAYS};
use crate::error::SignalError;
use crate::indicators::{IndicatorSet, IndicatorSnapshot};
use crate::mapper::{map_score, stop_loss, Band};
use crate::scoring::score_bar;

/// A scored bar in a historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBar {
    pub date: NaiveDate,
    pub close: f64,
    pub composite_score: f64,
    pub sub_signals: SubSignals,
    pub band: Band,
}

/// Everything the state tracker needs about the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub date: NaiveDate,
    pub close: f64,
    pub composite_score: f64,
    pub sub_signals: SubSignals,
    pub band: Band,
    pub stop_loss_price: f64,
    pub indicators: IndicatorSnapshot,
}

/// Check ordering, spacing and OHLC sanity of a weekly series.
///
/// An empty series is `DataUnavailable`; anything else that is wrong is
/// `MalformedInput` at the first offending index.
pub fn validate_bars(bars: &[Bar]) -> Result<(), SignalError> {
    if bars.is_empty() {
        return Err(SignalError::DataUnavailable);
    }

    for (i, bar) in bars.iter().enumerate() {
        if let Some(reason) = bar.sanity_violation() {
            return Err(SignalError::malformed(i, reason));
        }
        if i == 0 {
            continue;
        }
        let prev = &bars[i - 1];
        if bar.date <= prev.date {
            return Err(SignalError::malformed(
                i,
                format!("date {} does not follow {}", bar.date, prev.date),
            ));
        }
        let gap = (bar.date - prev.date).num_days();
        if gap < MIN_WEEKLY_SPACING_DAYS {
            return Err(SignalError::malformed(
                i,
                format!(
                    "bars {} and {} are {gap} days apart; weekly data expected",
                    prev.date, bar.date
                ),
            ));
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: StrategyConfig,
}

impl SignalEngine {
    /// Build an engine; the configuration is validated once here.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Bars needed before the last one can be scored.
    pub fn required_bars(&self) -> usize {
        self.config.indicators.required_bars()
    }

    /// Score every bar of a history. Warm-up bars are `None`.
    pub fn evaluate_series(&self, bars: &[Bar]) -> Result<Vec<Option<ScoredBar>>, SignalError> {
        validate_bars(bars)?;
        let sets = IndicatorSet::compute_series(bars, &self.config.indicators);

        Ok(bars
            .iter()
            .zip(&sets)
            .map(|(bar, set)| {
                let (score, subs, _) = score_bar(bar.close, set, &self.config)?;
                Some(ScoredBar {
                    date: bar.date,
                    close: bar.close,
                    composite_score: score,
                    sub_signals: subs,
                    band: map_score(score, &self.config.signals),
                })
            })
            .collect())
    }

    /// Evaluate the most recent bar.
    pub fn evaluate_latest(&self, bars: &[Bar]) -> Result<Evaluation, SignalError> {
        validate_bars(bars)?;

        let required = self.required_bars();
        if bars.len() < required {
            return Err(SignalError::InsufficientHistory {
                required,
                available: bars.len(),
            });
        }

        let sets = IndicatorSet::compute_series(bars, &self.config.indicators);
        let last = bars.len() - 1;
        let bar = &bars[last];
        let (score, subs, snapshot) =
            score_bar(bar.close, &sets[last], &self.config).ok_or(
                SignalError::InsufficientHistory {
                    required,
                    available: bars.len(),
                },
            )?;

        let band = map_score(score, &self.config.signals);
        let stop = stop_loss(
            bar.close,
            snapshot.atr,
            snapshot.ma_long,
            self.config.stop.atr_multiplier,
        );

        debug!(
            date = %bar.date,
            close = bar.close,
            score,
            trend = subs.trend,
            slope = subs.slope,
            momentum = subs.momentum,
            environment = subs.environment,
            signal = %band.signal_type,
            stop,
            "evaluated latest bar"
        );

        Ok(Evaluation {
            date: bar.date,
            close: bar.close,
            composite_score: score,
            sub_signals: subs,
            band,
            stop_loss_price: stop,
            indicators: snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn engine() -> SignalEngine {
        SignalEngine::new(StrategyConfig::default()).unwrap()
    }

    #[test]
    fn empty_series_is_unavailable() {
        assert_eq!(engine().evaluate_latest(&[]), Err(SignalError::DataUnavailable));
    }

    #[test]
    fn short_series_is_insufficient() {
        let bars = make_bars(&[100.0; 30]);
        match engine().evaluate_latest(&bars) {
            Err(SignalError::InsufficientHistory {
                required,
                available,
            }) => {
                assert_eq!(required, 45);
                assert_eq!(available, 30);
            }
            other => panic!("expected InsufficientHistory, got {other:?}"),
        }
    }

    #[test]
    fn daily_spacing_is_malformed() {
        let mut bars = make_bars(&[100.0; 50]);
        bars[10].date = bars[9].date + chrono::Duration::days(1);
        match engine().evaluate_latest(&bars) {
            Err(SignalError::MalformedInput { index, .. }) => assert_eq!(index, 10),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_date_is_malformed() {
        let mut bars = make_bars(&[100.0; 50]);
        bars[20].date = bars[19].date;
        assert!(matches!(
            validate_bars(&bars),
            Err(SignalError::MalformedInput { index: 20, .. })
        ));
    }

    #[test]
    fn non_finite_price_is_malformed() {
        let mut bars = make_bars(&[100.0; 50]);
        bars[5].close = f64::NAN;
        assert!(matches!(
            validate_bars(&bars),
            Err(SignalError::MalformedInput { index: 5, .. })
        ));
    }

    #[test]
    fn warmup_bars_are_unscored() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let scored = engine().evaluate_series(&make_bars(&closes)).unwrap();
        assert_eq!(scored.len(), 60);
        assert!(scored[..44].iter().all(Option::is_none));
        assert!(scored[44..].iter().all(Option::is_some));
    }

    #[test]
    fn latest_matches_series_tail() {
        let closes: Vec<f64> = (0..70)
            .map(|i| 100.0 + (i as f64 * 0.25).sin() * 6.0)
            .collect();
        let bars = make_bars(&closes);
        let e = engine();
        let latest = e.evaluate_latest(&bars).unwrap();
        let series = e.evaluate_series(&bars).unwrap();
        let tail = series.last().cloned().flatten().unwrap();
        assert_eq!(latest.composite_score, tail.composite_score);
        assert_eq!(latest.band, tail.band);
        assert!((-1.0..=1.0).contains(&latest.composite_score));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = StrategyConfig::default();
        config.weights.trend = 0.9;
        assert!(SignalEngine::new(config).is_err());
    }
}
