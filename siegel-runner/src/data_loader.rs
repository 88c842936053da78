//! CSV price loading.
//!
//! Expected columns (header names are case-insensitive, order is free):
//! `date, open, high, low, close` and optionally `volume`. Any other column,
//! such as `adj_close`, is ignored. Dates are `YYYY-MM-DD`; a trailing time
//! component (`2024-01-05 00:00:00`, `2024-01-05T00:00:00`) is accepted and
//! dropped.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use siegel_core::domain::Bar;
use siegel_core::SignalError;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("price file {path} not found")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// `row` is the index of the bar being parsed; `line` is the file line.
    #[error("line {line}: {message}")]
    Parse {
        line: u64,
        row: usize,
        message: String,
    },

    #[error("price file {path} has no rows")]
    Empty { path: PathBuf },
}

impl LoadError {
    /// Classify as a data error for the run outcome.
    pub fn to_signal_error(&self) -> SignalError {
        match self {
            LoadError::NotFound { .. } | LoadError::Empty { .. } => SignalError::DataUnavailable,
            LoadError::Io { .. } => SignalError::DataUnavailable,
            LoadError::Parse { row, .. } => SignalError::malformed(*row, self.to_string()),
            LoadError::Csv(_) | LoadError::MissingColumn(_) => {
                SignalError::malformed(0, self.to_string())
            }
        }
    }
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_ascii_lowercase()).collect();
        let find = |name: &'static str| names.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(LoadError::MissingColumn(name));

        // A pandas index column is written with an empty header.
        let date = find("date")
            .or_else(|| find("datetime"))
            .or_else(|| find("timestamp"))
            .or_else(|| names.first().filter(|h| h.is_empty()).map(|_| 0))
            .ok_or(LoadError::MissingColumn("date"))?;

        Ok(Self {
            date,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(|c: char| c == ' ' || c == 'T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    (line, row): (u64, usize),
) -> Result<f64, LoadError> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| LoadError::Parse {
        line,
        row,
        message: format!("invalid {name} value '{raw}'"),
    })
}

/// Parse bars from any CSV reader. Rows are returned in file order.
///
/// Input with no header line at all yields no bars.
pub fn read_bars<R: std::io::Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::from_headers(headers)?;

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let at = (line, bars.len());

        let raw_date = record.get(cols.date).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| LoadError::Parse {
            line,
            row: bars.len(),
            message: format!("invalid date '{raw_date}'"),
        })?;
        let volume = match cols.volume {
            Some(idx) if !record.get(idx).unwrap_or("").is_empty() => {
                parse_field(&record, idx, "volume", at)?
            }
            _ => 0.0,
        };

        bars.push(Bar {
            date,
            open: parse_field(&record, cols.open, "open", at)?,
            high: parse_field(&record, cols.high, "high", at)?,
            low: parse_field(&record, cols.low, "low", at)?,
            close: parse_field(&record, cols.close, "close", at)?,
            volume,
        });
    }

    Ok(bars)
}

/// Load bars from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let bars = read_bars(std::io::BufReader::new(file))?;
    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), rows = bars.len(), "loaded price file");
    Ok(bars)
}
