//! Backtest statistics of the signal over its own history.
//!
//! The position at each scored week comes from that week's band; Hold carries
//! the previous week's position (flat before the first band). Equity compounds
//! weekly: `equity[t] = equity[t-1] * (1 + return[t] * position[t-1] / 100)`.

use serde::{Deserialize, Serialize};
use siegel_core::ScoredBar;

/// Weeks per year for annualization.
pub const WEEKS_PER_YEAR: f64 = 52.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Number of scored weeks.
    pub weeks: usize,
    pub total_return: f64,
    pub annual_return: f64,
    /// Negative fraction (-0.15 = 15% drawdown).
    pub max_drawdown: f64,
    pub volatility: f64,
    pub sharpe: f64,
    /// Number of position changes.
    pub trade_count: usize,
    /// `None` with fewer than two position changes.
    pub win_rate: Option<f64>,
}

/// (close, position_pct) for every scored week, in order.
pub fn position_path(scored: &[Option<ScoredBar>]) -> Vec<(f64, f64)> {
    let mut prev = None;
    scored
        .iter()
        .flatten()
        .map(|bar| {
            let pct = bar.band.position.resolve(prev);
            prev = Some(pct);
            (bar.close, pct)
        })
        .collect()
}

/// Weekly-compounded equity curve starting at 1.0.
pub fn equity_curve(path: &[(f64, f64)]) -> Vec<f64> {
    let mut equity = Vec::with_capacity(path.len());
    let mut value = 1.0;
    for (i, &(close, _)) in path.iter().enumerate() {
        if i > 0 {
            let (prev_close, prev_pct) = path[i - 1];
            let ret = close / prev_close - 1.0;
            value *= 1.0 + ret * prev_pct / 100.0;
        }
        equity.push(value);
    }
    equity
}

/// Maximum drawdown as a negative fraction; 0.0 for a never-falling curve.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        peak = peak.max(eq);
        if peak > 0.0 {
            max_dd = max_dd.min(eq / peak - 1.0);
        }
    }
    max_dd
}

fn returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Fraction of position changes that were right about the move to the next
/// change: invested and price rose, or flat and price fell.
fn win_rate(path: &[(f64, f64)]) -> Option<f64> {
    let changes: Vec<(f64, f64)> = path
        .windows(2)
        .filter(|w| w[1].1 != w[0].1)
        .map(|w| w[1])
        .collect();
    if changes.len() < 2 {
        return None;
    }
    let wins = changes
        .windows(2)
        .filter(|w| {
            let (close, pct) = w[0];
            let next_ret = w[1].0 / close - 1.0;
            (pct > 0.0 && next_ret > 0.0) || (pct == 0.0 && next_ret < 0.0)
        })
        .count();
    Some(wins as f64 / changes.len() as f64)
}

impl BacktestStats {
    /// Statistics over a scored series. `None` with fewer than two scored weeks.
    pub fn compute(scored: &[Option<ScoredBar>]) -> Option<Self> {
        let path = position_path(scored);
        if path.len() < 2 {
            return None;
        }

        let equity = equity_curve(&path);
        let weekly = returns(&equity);
        let total_return = equity.last().copied().unwrap_or(1.0) - 1.0;
        let years = (path.len() - 1) as f64 / WEEKS_PER_YEAR;
        let annual_return = if total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            -1.0
        };
        let sd = std_dev(&weekly);
        let sharpe = if sd < 1e-15 {
            0.0
        } else {
            mean(&weekly) / sd * WEEKS_PER_YEAR.sqrt()
        };

        Some(Self {
            weeks: path.len(),
            total_return,
            annual_return,
            max_drawdown: max_drawdown(&equity),
            volatility: sd * WEEKS_PER_YEAR.sqrt(),
            sharpe,
            trade_count: path.windows(2).filter(|w| w[1].1 != w[0].1).count(),
            win_rate: win_rate(&path),
        })
    }
}
