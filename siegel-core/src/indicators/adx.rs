//! ADX (Average Directional Index, Wilder) and its directional lines.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: period for +DI/-DI, 2 * period - 1 for ADX.
//! A zero smoothed range (perfectly flat market) yields DI = 0 and DX = 0.

use super::atr::{true_range, wilder_smooth};
use super::{Indicator, Series};
use crate::domain::Bar;

/// Which output line an `Adx` instance produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionalLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: DirectionalLine,
    name: String,
}

impl Adx {
    pub fn new(period: usize, line: DirectionalLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let prefix = match line {
            DirectionalLine::Adx => "adx",
            DirectionalLine::PlusDi => "plus_di",
            DirectionalLine::MinusDi => "minus_di",
        };
        Self {
            period,
            line,
            name: format!("{prefix}_{period}"),
        }
    }
}

/// All three directional series for one period.
#[derive(Debug, Clone)]
pub struct DirectionalSeries {
    pub plus_di: Series,
    pub minus_di: Series,
    pub adx: Series,
}

/// Compute +DI, -DI and ADX together; they share the smoothed TR and DM.
pub fn directional_series(bars: &[Bar], period: usize) -> DirectionalSeries {
    let n = bars.len();

    let mut plus_dm = vec![None; n];
    let mut minus_dm = vec![None; n];
    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });
    }

    let smooth_tr = wilder_smooth(&true_range(bars), period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    let mut plus_di = vec![None; n];
    let mut minus_di = vec![None; n];
    let mut dx = vec![None; n];
    for i in 0..n {
        let (Some(tr), Some(p), Some(m)) = (smooth_tr[i], smooth_plus[i], smooth_minus[i]) else {
            continue;
        };
        let (pdi, mdi) = if tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * p / tr, 100.0 * m / tr)
        };
        let di_sum = pdi + mdi;
        plus_di[i] = Some(pdi);
        minus_di[i] = Some(mdi);
        dx[i] = Some(if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (pdi - mdi).abs() / di_sum
        });
    }

    DirectionalSeries {
        plus_di,
        minus_di,
        adx: wilder_smooth(&dx, period),
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            DirectionalLine::Adx => 2 * self.period - 1,
            DirectionalLine::PlusDi | DirectionalLine::MinusDi => self.period,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        let series = directional_series(bars, self.period);
        match self.line {
            DirectionalLine::Adx => series.adx,
            DirectionalLine::PlusDi => series.plus_di,
            DirectionalLine::MinusDi => series.minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn adx_bounds() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ]);
        let series = directional_series(&bars, 3);
        for line in [&series.adx, &series.plus_di, &series.minus_di] {
            for v in line.iter().flatten() {
                assert!((0.0..=100.0).contains(v), "out of bounds: {v}");
            }
        }
        assert!(series.adx[4].is_none());
        assert!(series.adx[5].is_some());
    }

    #[test]
    fn steady_uptrend_has_full_strength() {
        // Highs and lows both rise every bar: -DM is always 0, so DX = 100
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let series = directional_series(&make_bars(&closes), 14);

        assert_approx(series.minus_di[20], 0.0, DEFAULT_EPSILON);
        assert!(series.plus_di[20].unwrap() > 0.0);
        assert_approx(series.adx[27], 100.0, 1e-9);
        assert_approx(series.adx[39], 100.0, 1e-9);
    }

    #[test]
    fn flat_market_is_zero_not_undefined() {
        let bars = make_ohlc_bars(&[(100.0, 100.0, 100.0, 100.0); 12]);
        let series = directional_series(&bars, 3);
        assert_approx(series.plus_di[3], 0.0, DEFAULT_EPSILON);
        assert_approx(series.adx[5], 0.0, DEFAULT_EPSILON);
        assert_approx(series.adx[11], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn lookbacks_per_line() {
        assert_eq!(Adx::new(14, DirectionalLine::Adx).lookback(), 27);
        assert_eq!(Adx::new(14, DirectionalLine::PlusDi).lookback(), 14);
        assert_eq!(Adx::new(14, DirectionalLine::MinusDi).name(), "minus_di_14");
    }
}
