//! Siegel Runner: everything around the signal engine for one scheduled run.
//!
//! This crate builds on `siegel-core` to provide:
//! - TOML run configuration with a commented template
//! - CSV price loading and daily → weekly resampling
//! - JSON state store for the previous run's signal
//! - Run orchestration producing a JSON run report
//! - Backtest statistics of the signal over its history

pub mod config;
pub mod data_loader;
pub mod report;
pub mod resample;
pub mod runner;
pub mod state_store;
pub mod stats;

pub use config::{template, ConfigError, RunnerConfig};
pub use data_loader::{load_csv, read_bars, LoadError};
pub use report::RunReport;
pub use resample::{resample_weekly, ResampleMode};
pub use runner::{run_once, run_with_options, RunError, RunOptions};
pub use state_store::{JsonStateStore, StateStoreError};
pub use stats::BacktestStats;
