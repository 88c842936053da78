//! MACD: EMA(fast) - EMA(slow), its EMA signal line and the histogram.
//!
//! Line lookback: slow - 1. Signal and histogram lookback: slow + signal - 2.

use super::ema::ema_of_series;
use super::{closes, Indicator, Series};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be below slow period");
        let suffix = match line {
            MacdLine::Line => "",
            MacdLine::Signal => "_signal",
            MacdLine::Histogram => "_hist",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{fast}_{slow}_{signal}{suffix}"),
        }
    }

    /// MACD line and signal line, aligned with `bars`.
    pub fn lines(&self, bars: &[Bar]) -> (Series, Series) {
        let closes = closes(bars);
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        let line: Series = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_of_series(&line, self.signal);
        (line, signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Line => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Series {
        let (line, signal) = self.lines(bars);
        match self.line {
            MacdLine::Line => line,
            MacdLine::Signal => signal,
            MacdLine::Histogram => line
                .iter()
                .zip(&signal)
                .map(|(l, s)| Some((*l)? - (*s)?))
                .collect(),
        }
    }
}
