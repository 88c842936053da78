//! Signal output types and the state that survives between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading recommendation, ordered from most bearish to most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl SignalType {
    pub fn is_buy(self) -> bool {
        matches!(self, SignalType::Buy | SignalType::StrongBuy)
    }

    pub fn is_sell(self) -> bool {
        matches!(self, SignalType::Sell | SignalType::StrongSell)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalType::StrongSell => "STRONG_SELL",
            SignalType::Sell => "SELL",
            SignalType::Hold => "HOLD",
            SignalType::Buy => "BUY",
            SignalType::StrongBuy => "STRONG_BUY",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four clamped components of the composite score, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubSignals {
    pub trend: f64,
    pub slope: f64,
    pub momentum: f64,
    pub environment: f64,
}

/// Final output of one run for the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub date: NaiveDate,
    pub close: f64,
    pub composite_score: f64,
    pub sub_signals: SubSignals,
    pub signal_type: SignalType,
    /// Recommended exposure in percent of the base allocation (100.0 = fully invested).
    pub position_pct: f64,
    pub stop_loss_price: f64,
}

impl SignalResult {
    pub fn holds_long(&self) -> bool {
        self.position_pct > 0.0
    }
}

/// The only data carried from one run to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub last_signal_type: SignalType,
    pub last_position_pct: f64,
}

impl From<&SignalResult> for PersistedState {
    fn from(result: &SignalResult) -> Self {
        Self {
            last_signal_type: result.signal_type,
            last_position_pct: result.position_pct,
        }
    }
}

/// What the position change between two runs means for a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionAction {
    /// Flat before, invested now.
    Open,
    Increase,
    Reduce,
    /// Invested before, flat now.
    Close,
    Maintain,
}

impl PositionAction {
    pub fn between(previous_pct: f64, current_pct: f64) -> Self {
        if current_pct > previous_pct {
            if previous_pct == 0.0 {
                PositionAction::Open
            } else {
                PositionAction::Increase
            }
        } else if current_pct < previous_pct {
            if current_pct == 0.0 {
                PositionAction::Close
            } else {
                PositionAction::Reduce
            }
        } else {
            PositionAction::Maintain
        }
    }
}
