//! Run report: the JSON document a scheduled run emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use siegel_core::domain::{PositionAction, SignalResult};
use siegel_core::indicators::IndicatorSnapshot;
use siegel_core::{DataErrorReport, RunOutcome};

use crate::stats::BacktestStats;

/// Current schema version for emitted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    /// BLAKE3 fingerprint of the strategy parameters.
    pub config_hash: String,
    pub result: Option<SignalResult>,
    pub changed: bool,
    pub data_error: Option<DataErrorReport>,
    pub action: Option<PositionAction>,
    /// Whether downstream should send a notification.
    pub notify: bool,
    /// Indicator values at the evaluated bar.
    pub indicators: Option<IndicatorSnapshot>,
    pub stats: Option<BacktestStats>,
    /// Weekly bars the evaluation saw.
    pub weekly_bars: usize,
    pub state_saved: bool,
}

impl RunReport {
    pub fn new(symbol: &str, config_hash: String, outcome: RunOutcome) -> Self {
        let notify = outcome.notify();
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            config_hash,
            result: outcome.result,
            changed: outcome.changed,
            data_error: outcome.data_error,
            action: outcome.action,
            notify,
            indicators: None,
            stats: None,
            weekly_bars: 0,
            state_saved: false,
        }
    }

    /// One-line human summary for logs.
    pub fn summary(&self) -> String {
        match (&self.result, &self.data_error) {
            (Some(r), _) => format!(
                "{} {}: {} score={:.3} position={}% stop={:.2}{}",
                self.symbol,
                r.date,
                r.signal_type,
                r.composite_score,
                r.position_pct,
                r.stop_loss_price,
                if self.changed { " (changed)" } else { "" }
            ),
            (None, Some(e)) => format!("{}: data error: {}", self.symbol, e.message),
            (None, None) => format!("{}: no result", self.symbol),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
