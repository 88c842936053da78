//! Daily → weekly resampling.
//!
//! Weeks end on Sunday and are labelled with that Sunday's date. Within a
//! week: open = first, high = max, low = min, close = last, volume = sum.
//! Weeks without any input bar produce no output bar.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use siegel_core::domain::{Bar, MIN_WEEKLY_SPACING_DAYS};
use siegel_core::SignalError;

/// When to resample loaded prices before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMode {
    /// Resample when the median spacing between bars is below weekly.
    #[default]
    Auto,
    Always,
    Never,
}

impl ResampleMode {
    pub fn should_resample(self, bars: &[Bar]) -> bool {
        match self {
            ResampleMode::Always => true,
            ResampleMode::Never => false,
            ResampleMode::Auto => {
                median_spacing_days(bars).is_some_and(|d| d < MIN_WEEKLY_SPACING_DAYS)
            }
        }
    }
}

/// Median gap in days between consecutive bars, `None` for fewer than 2 bars.
pub fn median_spacing_days(bars: &[Bar]) -> Option<i64> {
    let mut gaps: Vec<i64> = bars
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days())
        .collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort_unstable();
    Some(gaps[gaps.len() / 2])
}

/// The Sunday that closes the week containing `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(days_to_sunday)
}

/// Aggregate bars into Sunday-ending weeks.
///
/// Input is sorted by date first; a repeated date is malformed input.
pub fn resample_weekly(bars: &[Bar]) -> Result<Vec<Bar>, SignalError> {
    if bars.is_empty() {
        return Err(SignalError::DataUnavailable);
    }

    let mut sorted = bars.to_vec();
    sorted.sort_by_key(|b| b.date);
    if let Some(i) = sorted.windows(2).position(|w| w[0].date == w[1].date) {
        return Err(SignalError::malformed(
            i + 1,
            format!("duplicate date {}", sorted[i].date),
        ));
    }

    let mut weekly: Vec<Bar> = Vec::new();
    for bar in sorted {
        let label = week_ending(bar.date);
        match weekly.last_mut() {
            Some(week) if week.date == label => {
                week.high = week.high.max(bar.high);
                week.low = week.low.min(bar.low);
                week.close = bar.close;
                week.volume += bar.volume;
            }
            _ => weekly.push(Bar { date: label, ..bar }),
        }
    }

    Ok(weekly)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32, o: f64, h: f64, l: f64, c: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: o,
            high: h,
            low: l,
            close: c,
            volume: 10.0,
        }
    }

    #[test]
    fn week_ends_on_sunday() {
        // 2024-01-01 is a Monday
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(week_ending(monday), sunday);
        assert_eq!(week_ending(sunday), sunday);
    }

    #[test]
    fn aggregates_ohlcv() {
        let bars = vec![
            day(2024, 1, 2, 10.0, 12.0, 9.0, 11.0),
            day(2024, 1, 3, 11.0, 15.0, 10.0, 14.0),
            day(2024, 1, 5, 14.0, 14.5, 8.0, 9.5),
            day(2024, 1, 8, 9.5, 10.0, 9.0, 9.8),
        ];
        let weekly = resample_weekly(&bars).unwrap();
        assert_eq!(weekly.len(), 2);

        let w = &weekly[0];
        assert_eq!(w.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!((w.open, w.high, w.low, w.close), (10.0, 15.0, 8.0, 9.5));
        assert_eq!(w.volume, 30.0);
        assert_eq!(weekly[1].date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn empty_weeks_are_skipped() {
        let bars = vec![
            day(2024, 1, 2, 10.0, 11.0, 9.0, 10.0),
            day(2024, 1, 23, 10.0, 11.0, 9.0, 10.5),
        ];
        let weekly = resample_weekly(&bars).unwrap();
        assert_eq!(weekly.len(), 2);
        assert_eq!((weekly[1].date - weekly[0].date).num_days(), 21);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let bars = vec![
            day(2024, 1, 3, 11.0, 12.0, 10.0, 11.5),
            day(2024, 1, 2, 10.0, 11.0, 9.0, 10.0),
        ];
        let weekly = resample_weekly(&bars).unwrap();
        assert_eq!(weekly[0].open, 10.0);
        assert_eq!(weekly[0].close, 11.5);
    }

    #[test]
    fn duplicate_dates_rejected() {
        let bars = vec![
            day(2024, 1, 2, 10.0, 11.0, 9.0, 10.0),
            day(2024, 1, 2, 10.0, 11.0, 9.0, 10.0),
        ];
        assert!(matches!(
            resample_weekly(&bars),
            Err(SignalError::MalformedInput { index: 1, .. })
        ));
    }

    #[test]
    fn auto_mode_detects_daily() {
        let daily: Vec<Bar> = (1..=10).map(|d| day(2024, 1, d, 1.0, 1.0, 1.0, 1.0)).collect();
        assert!(ResampleMode::Auto.should_resample(&daily));
        assert!(!ResampleMode::Never.should_resample(&daily));

        let weekly = resample_weekly(&daily).unwrap();
        assert!(!ResampleMode::Auto.should_resample(&weekly));
        assert!(ResampleMode::Always.should_resample(&weekly));
    }
}
