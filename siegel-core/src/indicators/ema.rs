//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2/(period+1).
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::{closes, Indicator, Series};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        ema_of_series(&closes(bars), self.period)
    }
}

/// EMA of an arbitrary series whose leading entries may be undefined.
///
/// The seed is the mean of the first `period` defined values, starting at the
/// first defined entry. An undefined value after the seed leaves the rest of
/// the output undefined. Used by composed indicators (MACD signal line).
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Series {
    seeded_smooth(values, period, 2.0 / (period as f64 + 1.0))
}

/// Mean-seeded recursive smoothing shared by EMA and Wilder smoothing.
pub(crate) fn seeded_smooth(values: &[Option<f64>], period: usize, alpha: f64) -> Series {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(start) = values.iter().position(Option::is_some) else {
        return result;
    };
    if period == 0 || n - start < period {
        return result;
    }

    let mut sum = 0.0;
    for v in &values[start..start + period] {
        match v {
            Some(v) => sum += v,
            None => return result,
        }
    }
    let seed = sum / period as f64;
    let seed_index = start + period - 1;
    result[seed_index] = Some(seed);

    let mut prev = seed;
    for i in (seed_index + 1)..n {
        let Some(v) = values[i] else {
            return result;
        };
        prev = alpha * v + (1.0 - alpha) * prev;
        result[i] = Some(prev);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, seed at index 2 = SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11 = 12.0, EMA[4] = 0.5*14 + 0.5*12 = 13.0
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).compute(&bars);

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_series_skips_leading_undefined() {
        let values = vec![None, None, Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let result = ema_of_series(&values, 2);
        // seed at index 3 = mean(2, 4) = 3; alpha = 2/3
        assert!(result[..3].iter().all(Option::is_none));
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 2.0 / 3.0 * 6.0 + 1.0 / 3.0 * 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_series_gap_after_seed_stops() {
        let values = vec![Some(1.0), Some(3.0), None, Some(5.0)];
        let result = ema_of_series(&values, 2);
        assert_approx(result[1], 2.0, DEFAULT_EPSILON);
        assert!(result[2].is_none());
        assert!(result[3].is_none());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(26).lookback(), 25);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
