//! Write the series file read by the charting application.
//!
//! Two layouts, both overwrite the target and create missing parent dirs:
//!
//! - events: `time,open,high,low,close,volume` header, one row per event,
//!   `time` in epoch seconds, ascending
//! - daily: no header, `YYYYMMDDT,open,high,low,close,volume`, ascending by date
//!
//! OHLC all carry the severity; volume is always 0.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{DailyAggregate, NormalizedRecord};
use crate::error::{AppError, ErrorKind};

const EVENTS_HEADER: &str = "time,open,high,low,close,volume";
const DAILY_DATE_FORMAT: &str = "%Y%m%dT";

/// Write one row per event, sorted by timestamp. Returns the row count.
pub fn write_events_csv(path: &Path, records: &[NormalizedRecord]) -> Result<usize, AppError> {
    if records.is_empty() {
        return Err(nothing_to_save(path));
    }

    let mut rows: Vec<(i64, u8)> = records.iter().map(|r| (r.timestamp, r.severity.value())).collect();
    rows.sort_by_key(|(ts, _)| *ts);

    let mut out = create_output(path)?;
    writeln!(out, "{EVENTS_HEADER}").map_err(|e| write_error(path, e))?;
    for (ts, sev) in &rows {
        writeln!(out, "{ts},{sev},{sev},{sev},{sev},0").map_err(|e| write_error(path, e))?;
    }
    out.flush().map_err(|e| write_error(path, e))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "saved event series");
    Ok(rows.len())
}

/// Write one headerless row per date. Returns the row count.
pub fn write_daily_csv(path: &Path, aggregates: &[DailyAggregate]) -> Result<usize, AppError> {
    if aggregates.is_empty() {
        return Err(nothing_to_save(path));
    }

    let mut rows: Vec<&DailyAggregate> = aggregates.iter().collect();
    rows.sort_by_key(|a| a.date);

    let mut out = create_output(path)?;
    for agg in &rows {
        let sev = agg.severity.value();
        writeln!(
            out,
            "{},{sev},{sev},{sev},{sev},0",
            agg.date.format(DAILY_DATE_FORMAT)
        )
        .map_err(|e| write_error(path, e))?;
    }
    out.flush().map_err(|e| write_error(path, e))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "saved daily series");
    Ok(rows.len())
}

/// Create (or truncate) `path`, making its parent directories first.
pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>, AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::new(
                ErrorKind::Write,
                format!("Failed to create directory '{}': {e}", parent.display()),
            )
        })?;
    }
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Write,
            format!("Failed to create '{}': {e}", path.display()),
        )
    })?;
    Ok(BufWriter::new(file))
}

pub(crate) fn write_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(
        ErrorKind::Write,
        format!("Failed to write '{}': {e}", path.display()),
    )
}

fn nothing_to_save(path: &Path) -> AppError {
    AppError::new(
        ErrorKind::Empty,
        format!("Nothing to save; '{}' left untouched.", path.display()),
    )
}
