//! Score → signal band → position size, and the protective stop level.

use serde::{Deserialize, Serialize};

use crate::config::SignalConfig;
use crate::domain::SignalType;

/// Position a band prescribes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pct", rename_all = "snake_case")]
pub enum PositionSize {
    /// Target exposure in percent.
    Percent(f64),
    /// Keep whatever the previous run recommended.
    Unchanged,
}

impl PositionSize {
    /// Concrete percentage given the prior run's position.
    pub fn resolve(self, prior_pct: Option<f64>) -> f64 {
        match self {
            PositionSize::Percent(pct) => pct,
            PositionSize::Unchanged => prior_pct.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub signal_type: SignalType,
    pub position: PositionSize,
}

/// Map a composite score onto its band.
///
/// Bands are checked highest confidence first: buy bands top-down, then sell
/// bands bottom-up, then Hold. A score hits exactly one band.
pub fn map_score(score: f64, config: &SignalConfig) -> Band {
    let p = &config.positions;
    let (signal_type, position) = if score >= config.very_strong_signal {
        (SignalType::StrongBuy, PositionSize::Percent(p.very_strong))
    } else if score >= config.strong_signal {
        (SignalType::Buy, PositionSize::Percent(p.strong))
    } else if score >= config.weak_signal {
        (SignalType::Buy, PositionSize::Percent(p.standard))
    } else if score >= config.signal_threshold {
        (SignalType::Buy, PositionSize::Percent(p.weak))
    } else if score <= config.strong_sell_signal {
        (SignalType::StrongSell, PositionSize::Percent(p.strong_sell))
    } else if score <= config.sell_signal {
        (SignalType::Sell, PositionSize::Percent(p.sell))
    } else {
        (SignalType::Hold, PositionSize::Unchanged)
    };
    Band {
        signal_type,
        position,
    }
}

/// Protective stop: the tighter of the ATR stop and the long-MA floor.
pub fn stop_loss(close: f64, atr: f64, ma_long: f64, atr_multiplier: f64) -> f64 {
    (close - atr_multiplier * atr).max(ma_long)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(score: f64) -> Band {
        map_score(score, &SignalConfig::default())
    }

    #[test]
    fn buy_bands() {
        assert_eq!(band(0.95).signal_type, SignalType::StrongBuy);
        assert_eq!(band(0.90).position, PositionSize::Percent(140.0));
        assert_eq!(band(0.80).position, PositionSize::Percent(120.0));
        assert_eq!(band(0.75).signal_type, SignalType::Buy);
        assert_eq!(band(0.70).position, PositionSize::Percent(100.0));
        assert_eq!(band(0.60).position, PositionSize::Percent(80.0));
        assert_eq!(band(0.50).signal_type, SignalType::Buy);
    }

    #[test]
    fn sell_bands() {
        assert_eq!(band(-0.6).signal_type, SignalType::Sell);
        assert_eq!(band(-0.5).position, PositionSize::Percent(0.0));
        assert_eq!(band(-0.75).signal_type, SignalType::StrongSell);
        assert_eq!(band(-1.0).signal_type, SignalType::StrongSell);
    }

    #[test]
    fn hold_keeps_prior_position() {
        let hold = band(0.1);
        assert_eq!(hold.signal_type, SignalType::Hold);
        assert_eq!(hold.position, PositionSize::Unchanged);
        assert_eq!(hold.position.resolve(Some(120.0)), 120.0);
        assert_eq!(hold.position.resolve(None), 0.0);
        assert_eq!(band(-0.49).signal_type, SignalType::Hold);
        assert_eq!(band(0.49).signal_type, SignalType::Hold);
    }

    #[test]
    fn mapping_is_idempotent() {
        for score in [-1.0, -0.6, 0.0, 0.55, 0.7, 0.8, 0.99] {
            assert_eq!(band(score), band(score));
        }
    }

    #[test]
    fn stop_takes_the_higher_level() {
        // close 100, atr 4, mult 2.5 → 90; ma_long 85 → stop 90
        assert_eq!(stop_loss(100.0, 4.0, 85.0, 2.5), 90.0);
        // MA floor above the ATR stop wins
        assert_eq!(stop_loss(100.0, 4.0, 95.0, 2.5), 95.0);
    }
}
