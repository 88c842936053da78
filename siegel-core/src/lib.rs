//! Siegel Core: weekly composite-signal engine.
//!
//! This crate turns a cleaned weekly price series into one trading decision:
//! - Domain types (bars, signal results, persisted run state)
//! - Indicator library (SMA, EMA, RSI, MACD, ADX/DI, ATR, MA slope)
//! - Composite scorer combining four normalized sub-signals
//! - Score → signal band → position mapping, and the protective stop
//! - Run-over-run state tracker that decides whether to notify
//!
//! No I/O happens here; loading prices and storing state is the runner's job.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod mapper;
pub mod scoring;
pub mod tracker;

pub use config::{ConfigError, StrategyConfig};
pub use engine::{Evaluation, ScoredBar, SignalEngine};
pub use error::{DataErrorKind, DataErrorReport, SignalError};
pub use tracker::{RunOutcome, StateTracker, Transition};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core value types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::SignalResult>();
        require_sync::<domain::SignalResult>();
        require_send::<domain::PersistedState>();
        require_sync::<domain::PersistedState>();

        // Indicators
        require_send::<indicators::IndicatorSet>();
        require_sync::<indicators::IndicatorSet>();
        require_send::<Box<dyn indicators::Indicator>>();
        require_sync::<Box<dyn indicators::Indicator>>();

        // Engine and tracker
        require_send::<StrategyConfig>();
        require_sync::<StrategyConfig>();
        require_send::<SignalEngine>();
        require_sync::<SignalEngine>();
        require_send::<Evaluation>();
        require_sync::<Evaluation>();
        require_send::<Transition>();
        require_sync::<Transition>();
        require_send::<SignalError>();
        require_sync::<SignalError>();
    }

    /// Architecture contract: the tracker sees the prior state only as an
    /// explicit argument. If it ever grows hidden state, this signature breaks.
    #[test]
    fn tracker_takes_prior_state_explicitly() {
        fn _check(
            prior: Option<&domain::PersistedState>,
            evaluation: Result<Evaluation, SignalError>,
        ) -> Transition {
            StateTracker::transition(prior, evaluation)
        }
    }
}
