//! The fixed indicator suite the scorer consumes, evaluated per bar.

use serde::{Deserialize, Serialize};

use super::adx::directional_series;
use super::{Adx, Atr, DirectionalLine, Indicator, Macd, MacdLine, RollingSlope, Rsi, Sma};
use crate::config::IndicatorConfig;
use crate::domain::Bar;

impl IndicatorConfig {
    /// Every indicator the scorer reads, configured from these periods.
    ///
    /// Expects a config that passed [`IndicatorConfig::validate`]: the
    /// indicator constructors panic on a zero period, and MACD on
    /// `macd_fast >= macd_slow`.
    pub fn build_all(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Sma::new(self.ma_short)),
            Box::new(Sma::new(self.ma_long)),
            Box::new(RollingSlope::new(self.ma_short, self.slope_window)),
            Box::new(Rsi::new(self.rsi_period)),
            Box::new(Macd::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
                MacdLine::Line,
            )),
            Box::new(Macd::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
                MacdLine::Signal,
            )),
            Box::new(Adx::new(self.adx_period, DirectionalLine::Adx)),
            Box::new(Adx::new(self.adx_period, DirectionalLine::PlusDi)),
            Box::new(Adx::new(self.adx_period, DirectionalLine::MinusDi)),
            Box::new(Atr::new(self.atr_period)),
        ]
    }
}

/// Indicator values at one bar. A field is `None` while its indicator warms up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub ma_slope: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub atr: Option<f64>,
}

/// A fully warmed-up `IndicatorSet`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ma_short: f64,
    pub ma_long: f64,
    pub ma_slope: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub atr: f64,
}

impl IndicatorSet {
    /// Compute the whole suite over `bars`, one `IndicatorSet` per bar.
    ///
    /// `config` must be validated, as for [`IndicatorConfig::build_all`].
    pub fn compute_series(bars: &[Bar], config: &IndicatorConfig) -> Vec<IndicatorSet> {
        let ma_short = Sma::new(config.ma_short).compute(bars);
        let ma_long = Sma::new(config.ma_long).compute(bars);
        let ma_slope = RollingSlope::new(config.ma_short, config.slope_window).compute(bars);
        let rsi = Rsi::new(config.rsi_period).compute(bars);
        let (macd_line, macd_signal) = Macd::new(
            config.macd_fast,
            config.macd_slow,
            config.macd_signal,
            MacdLine::Line,
        )
        .lines(bars);
        let directional = directional_series(bars, config.adx_period);
        let atr = Atr::new(config.atr_period).compute(bars);

        (0..bars.len())
            .map(|i| IndicatorSet {
                ma_short: ma_short[i],
                ma_long: ma_long[i],
                ma_slope: ma_slope[i],
                rsi: rsi[i],
                macd_line: macd_line[i],
                macd_signal: macd_signal[i],
                adx: directional.adx[i],
                plus_di: directional.plus_di[i],
                minus_di: directional.minus_di[i],
                atr: atr[i],
            })
            .collect()
    }

    /// All values, or `None` if any indicator is still warming up.
    pub fn complete(&self) -> Option<IndicatorSnapshot> {
        let macd_line = self.macd_line?;
        let macd_signal = self.macd_signal?;
        Some(IndicatorSnapshot {
            ma_short: self.ma_short?,
            ma_long: self.ma_long?,
            ma_slope: self.ma_slope?,
            rsi: self.rsi?,
            macd_line,
            macd_signal,
            macd_histogram: macd_line - macd_signal,
            adx: self.adx?,
            plus_di: self.plus_di?,
            minus_di: self.minus_di?,
            atr: self.atr?,
        })
    }
}
