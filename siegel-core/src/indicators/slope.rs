//! Rolling slope of a moving average.
//!
//! slope[t] = (SMA[t] - SMA[t-window]) / SMA[t-window], a fractional change.
//! Lookback: period - 1 + window.

use super::sma::Sma;
use super::{Indicator, Series};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingSlope {
    ma: Sma,
    period: usize,
    window: usize,
    name: String,
}

impl RollingSlope {
    pub fn new(period: usize, window: usize) -> Self {
        assert!(window >= 1, "slope window must be >= 1");
        Self {
            ma: Sma::new(period),
            period,
            window,
            name: format!("sma_{period}_slope_{window}"),
        }
    }
}

impl Indicator for RollingSlope {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1 + self.window
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        let ma = self.ma.compute(bars);
        (0..ma.len())
            .map(|i| {
                let past = ma[i.checked_sub(self.window)?]?;
                let now = ma[i]?;
                (past != 0.0).then(|| (now - past) / past)
            })
            .collect()
    }
}
