//! Run orchestration: load → resample → evaluate → track → persist → report.
//!
//! Problems with the price data never abort the run. They surface as a data
//! error inside the report (which always notifies) and leave the stored state
//! untouched. Only failures of the state store itself are hard errors.

use thiserror::Error;
use tracing::{info, warn};

use siegel_core::domain::Bar;
use siegel_core::{Evaluation, SignalEngine, SignalError, StateTracker};

use crate::config::{ConfigError, RunnerConfig};
use crate::data_loader::load_csv;
use crate::report::RunReport;
use crate::resample::resample_weekly;
use crate::state_store::{JsonStateStore, StateStoreError};
use crate::stats::BacktestStats;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("state store error: {0}")]
    State(#[from] StateStoreError),
}

/// Per-invocation switches that are not part of the strategy.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Persist the new state after a successful evaluation.
    pub save_state: bool,
    /// Compute backtest statistics over the whole history.
    pub with_stats: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            save_state: true,
            with_stats: true,
        }
    }
}

/// Run once with default options.
pub fn run_once(config: &RunnerConfig) -> Result<RunReport, RunError> {
    run_with_options(config, &RunOptions::default())
}

/// Load and prepare weekly bars, or the data error that prevents it.
pub fn load_weekly_bars(config: &RunnerConfig) -> Result<Vec<Bar>, SignalError> {
    let bars = load_csv(&config.run.prices_path).map_err(|e| {
        warn!(error = %e, path = %config.run.prices_path.display(), "price load failed");
        e.to_signal_error()
    })?;

    if config.run.resample.should_resample(&bars) {
        let weekly = resample_weekly(&bars)?;
        info!(daily = bars.len(), weekly = weekly.len(), "resampled to weekly bars");
        Ok(weekly)
    } else {
        Ok(bars)
    }
}

pub fn run_with_options(config: &RunnerConfig, opts: &RunOptions) -> Result<RunReport, RunError> {
    let engine = SignalEngine::new(config.strategy.clone()).map_err(ConfigError::from)?;
    let store = JsonStateStore::new(&config.run.state_path);
    let prior = store.load()?;

    let bars = load_weekly_bars(config);
    let weekly_bars = bars.as_ref().map_or(0, Vec::len);
    let evaluation: Result<Evaluation, SignalError> =
        bars.as_ref().map_err(Clone::clone).and_then(|b| engine.evaluate_latest(b));
    let indicators = evaluation.as_ref().ok().map(|e| e.indicators);

    let stats = match (&bars, opts.with_stats) {
        (Ok(b), true) => engine
            .evaluate_series(b)
            .ok()
            .and_then(|scored| BacktestStats::compute(&scored)),
        _ => None,
    };

    let transition = StateTracker::transition(prior.as_ref(), evaluation);

    let mut state_saved = false;
    if let Some(state) = &transition.state {
        if opts.save_state {
            store.save(state)?;
            state_saved = true;
        }
    }

    let mut report = RunReport::new(&config.run.symbol, config.config_hash(), transition.outcome);
    report.indicators = indicators;
    report.stats = stats;
    report.weekly_bars = weekly_bars;
    report.state_saved = state_saved;

    info!(
        symbol = %report.symbol,
        changed = report.changed,
        notify = report.notify,
        state_saved,
        "run complete"
    );
    Ok(report)
}
