//! End-to-end runs against files in a temp directory.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use siegel_core::domain::{PositionAction, SignalType};
use siegel_core::DataErrorKind;
use siegel_runner::{
    run_once, run_with_options, JsonStateStore, ResampleMode, RunOptions, RunnerConfig,
};

/// Write a daily CSV (weekdays only) with a steady geometric uptrend.
fn write_daily_uptrend(path: &Path, weeks: i64) {
    let mut csv = String::from("Date,Open,High,Low,Close,Adj_Close,Volume\n");
    let start = NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(); // Monday
    let mut prev = 100.0_f64;
    let mut day_index = 0;
    for d in 0..weeks * 7 {
        let date = start + Duration::days(d);
        if d % 7 >= 5 {
            continue; // weekend
        }
        let close = 100.0 * 1.004_f64.powi(day_index);
        let open = prev;
        let high = open.max(close) * 1.002;
        let low = open.min(close) * 0.998;
        writeln!(csv, "{date},{open},{high},{low},{close},{close},1000").unwrap();
        prev = close;
        day_index += 1;
    }
    std::fs::write(path, csv).unwrap();
}

fn config(dir: &Path) -> RunnerConfig {
    let toml = format!(
        r#"
        [run]
        symbol = "TEST"
        prices_path = "{}"
        state_path = "{}"
        "#,
        dir.join("prices.csv").display(),
        dir.join("state/last.json").display()
    );
    RunnerConfig::from_toml_str(&toml).unwrap()
}

#[test]
fn first_run_notifies_and_saves_state() {
    let dir = tempfile::tempdir().unwrap();
    write_daily_uptrend(&dir.path().join("prices.csv"), 70);
    let cfg = config(dir.path());

    let report = run_once(&cfg).unwrap();
    let result = report.result.as_ref().expect("signal expected");
    assert_eq!(result.signal_type, SignalType::StrongBuy);
    assert!(report.changed);
    assert!(report.notify);
    assert!(report.state_saved);
    assert_eq!(report.action, Some(PositionAction::Open));
    assert!(report.weekly_bars >= 69);
    assert!(report.indicators.is_some());
    assert!(report.stats.is_some());

    let stored = JsonStateStore::new(&cfg.run.state_path).load().unwrap().unwrap();
    assert_eq!(stored.last_signal_type, SignalType::StrongBuy);
    assert_eq!(stored.last_position_pct, result.position_pct);
}

#[test]
fn second_identical_run_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    write_daily_uptrend(&dir.path().join("prices.csv"), 70);
    let cfg = config(dir.path());

    run_once(&cfg).unwrap();
    let second = run_once(&cfg).unwrap();
    assert!(!second.changed);
    assert!(!second.notify);
    assert_eq!(second.action, Some(PositionAction::Maintain));
}

#[test]
fn missing_prices_is_data_error_not_failure() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    let report = run_once(&cfg).unwrap();
    assert!(report.result.is_none());
    assert!(report.notify);
    assert!(!report.state_saved);
    assert_eq!(
        report.data_error.map(|e| e.kind),
        Some(DataErrorKind::DataUnavailable)
    );
    assert!(!cfg.run.state_path.exists());
}

#[test]
fn short_history_keeps_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    write_daily_uptrend(&dir.path().join("prices.csv"), 70);
    run_once(&cfg).unwrap();
    let before = std::fs::read_to_string(&cfg.run.state_path).unwrap();

    write_daily_uptrend(&dir.path().join("prices.csv"), 10);
    let report = run_once(&cfg).unwrap();
    assert_eq!(
        report.data_error.map(|e| e.kind),
        Some(DataErrorKind::InsufficientHistory)
    );
    assert_eq!(std::fs::read_to_string(&cfg.run.state_path).unwrap(), before);
}

#[test]
fn daily_data_without_resampling_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write_daily_uptrend(&dir.path().join("prices.csv"), 70);
    let mut cfg = config(dir.path());
    cfg.run.resample = ResampleMode::Never;

    let report = run_once(&cfg).unwrap();
    assert_eq!(
        report.data_error.map(|e| e.kind),
        Some(DataErrorKind::MalformedInput)
    );
}

#[test]
fn no_save_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_daily_uptrend(&dir.path().join("prices.csv"), 70);
    let cfg = config(dir.path());

    let opts = RunOptions {
        save_state: false,
        with_stats: false,
    };
    let report = run_with_options(&cfg, &opts).unwrap();
    assert!(report.result.is_some());
    assert!(!report.state_saved);
    assert!(report.stats.is_none());
    assert!(!cfg.run.state_path.exists());
}
