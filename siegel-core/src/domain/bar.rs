//! Bar: one weekly OHLCV price point.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum spacing between consecutive bars. Anything tighter is not weekly data.
pub const MIN_WEEKLY_SPACING_DAYS: i64 = 5;

/// Weekly OHLCV bar for the analysed series.
///
/// Prices are expected to be already cleaned and resampled; the core only
/// checks them, it never repairs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Basic OHLCV sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        self.sanity_violation().is_none()
    }

    /// Describes the first sanity rule this bar breaks, if any.
    pub fn sanity_violation(&self) -> Option<String> {
        if self.is_void() {
            return Some("non-finite OHLCV value".into());
        }
        if self.open <= 0.0 || self.close <= 0.0 || self.low <= 0.0 {
            return Some(format!(
                "non-positive price (open={}, low={}, close={})",
                self.open, self.low, self.close
            ));
        }
        if self.high < self.low {
            return Some(format!("high {} below low {}", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return Some(format!(
                "high {} below open/close {}",
                self.high,
                self.open.max(self.close)
            ));
        }
        if self.low > self.open.min(self.close) {
            return Some(format!(
                "low {} above open/close {}",
                self.low,
                self.open.min(self.close)
            ));
        }
        if self.volume < 0.0 {
            return Some(format!("negative volume {}", self.volume));
        }
        None
    }
}
