//! Feed ingest and normalization.
//!
//! Turns the raw calendar CSV into `NormalizedRecord`s:
//!
//! - **Strict schema** for the columns we need (`Title`, `Date`, `Time`, `Impact`)
//! - **Row-level outcomes**: every row either parses or is dropped with a reason;
//!   a bad row never aborts the run
//! - **No I/O** beyond reading the in-memory body
//!
//! Untimed rows (empty time cell, or a label such as `All Day` / `Tentative`)
//! are kept with `time: None` and anchored at 00:00 of their date. A time cell
//! that looks like a clock value but does not parse is dropped.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;

use crate::domain::{DailyAggregate, Impact, NormalizedRecord, RawEvent};
use crate::error::{AppError, ErrorKind};

const DATE_FORMAT: &str = "%m-%d-%Y";
const TIME_FORMAT: &str = "%I:%M%p";

const REQUIRED_COLUMNS: [&str; 4] = ["title", "date", "time", "impact"];

/// Why a feed row did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The CSV reader could not decode the row.
    Malformed(String),
    MissingDate,
    InvalidDate(String),
    InvalidTime(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Malformed(e) => write!(f, "malformed row: {e}"),
            DropReason::MissingDate => write!(f, "missing date"),
            DropReason::InvalidDate(s) => write!(f, "invalid date '{s}' (expected MM-DD-YYYY)"),
            DropReason::InvalidTime(s) => write!(f, "invalid time '{s}' (expected H:MMam/pm)"),
        }
    }
}

/// A dropped row and where it was in the feed.
#[derive(Debug, Clone)]
pub struct DroppedRow {
    pub line: usize,
    pub title: Option<String>,
    pub reason: DropReason,
}

/// Normalizer output: records in feed order plus the rows that were dropped.
#[derive(Debug, Clone)]
pub struct NormalizedFeed {
    pub records: Vec<NormalizedRecord>,
    pub dropped: Vec<DroppedRow>,
    pub rows_read: usize,
}

impl NormalizedFeed {
    pub fn untimed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_untimed()).count()
    }
}

/// Parse and normalize a feed body.
///
/// Fails only when the header lacks a required column; row problems end up in
/// `dropped`.
pub fn normalize_feed(body: &str) -> Result<NormalizedFeed, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(ErrorKind::Feed, format!("Failed to read feed header: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut dropped = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                dropped.push(DroppedRow {
                    line,
                    title: None,
                    reason: DropReason::Malformed(e.to_string()),
                });
                continue;
            }
        };

        let raw = parse_row(&record, &header_map);
        match normalize_event(&raw) {
            Ok(rec) => records.push(rec),
            Err(reason) => {
                tracing::debug!(line, title = %raw.title, %reason, "dropping feed row");
                dropped.push(DroppedRow {
                    line,
                    title: Some(raw.title),
                    reason,
                });
            }
        }
    }

    if !dropped.is_empty() {
        tracing::warn!(
            dropped = dropped.len(),
            rows_read,
            "dropped unparseable feed rows"
        );
    }

    Ok(NormalizedFeed {
        records,
        dropped,
        rows_read,
    })
}

/// Resolve one raw row into a record, or say why it cannot be.
pub fn normalize_event(raw: &RawEvent) -> Result<NormalizedRecord, DropReason> {
    if raw.date.is_empty() {
        return Err(DropReason::MissingDate);
    }
    let date = parse_date(&raw.date)?;
    let time = match raw.time.as_deref() {
        Some(t) => parse_time(t)?,
        None => None,
    };

    Ok(NormalizedRecord {
        title: raw.title.clone(),
        country: raw.country.clone(),
        date,
        time,
        timestamp: combine_timestamp(date, time),
        severity: raw.impact.severity(),
    })
}

/// Collapse records into one bar per calendar date (max severity), ascending.
pub fn aggregate_daily(records: &[NormalizedRecord]) -> Vec<DailyAggregate> {
    let mut by_date: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();
    for rec in records {
        by_date
            .entry(rec.date)
            .and_modify(|agg| {
                agg.severity = agg.severity.max(rec.severity);
                agg.events += 1;
            })
            .or_insert(DailyAggregate {
                date: rec.date,
                severity: rec.severity,
                events: 1,
            });
    }
    by_date.into_values().collect()
}

/// Epoch seconds for a feed date/time; feed clock times are UTC.
pub fn combine_timestamp(date: NaiveDate, time: Option<NaiveTime>) -> i64 {
    let dt = NaiveDateTime::new(date, time.unwrap_or(NaiveTime::MIN));
    dt.and_utc().timestamp()
}

fn parse_date(s: &str) -> Result<NaiveDate, DropReason> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| DropReason::InvalidDate(s.to_string()))
}

/// `Ok(None)` means "untimed": the cell holds a label rather than a clock value.
fn parse_time(s: &str) -> Result<Option<NaiveTime>, DropReason> {
    let looks_like_clock = s.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !looks_like_clock {
        return Ok(None);
    }
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map(Some)
        .map_err(|_| DropReason::InvalidTime(s.to_string()))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // A UTF-8 BOM on the first header would otherwise hide the `title` column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(
                ErrorKind::Feed,
                format!("Feed is missing required column: `{name}`"),
            ));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawEvent {
    RawEvent {
        title: get_optional(record, header_map, "title")
            .unwrap_or_default()
            .to_string(),
        country: get_optional(record, header_map, "country").map(str::to_string),
        date: get_optional(record, header_map, "date")
            .unwrap_or_default()
            .to_string(),
        time: get_optional(record, header_map, "time").map(str::to_string),
        impact: Impact::from_label(get_optional(record, header_map, "impact").unwrap_or_default()),
    }
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;

    const FEED: &str = "\
Title,Country,Date,Time,Impact,Forecast,Previous,URL
German Prelim CPI m/m,EUR,09-29-2025,7:00am,High,0.1%,0.1%,https://example.test/1
Bank Holiday,CNY,10-01-2025,All Day,Holiday,,,https://example.test/2
Pending Home Sales m/m,USD,09-29-2025,2:00pm,Medium,0.2%,-0.4%,https://example.test/3
Broken Row,USD,2025/09/30,8:30am,Low,,,https://example.test/4
Speech,USD,09-30-2025,25:00pm,Low,,,https://example.test/5
Tentative Thing,GBP,09-30-2025,Tentative,Non-Economic,,,https://example.test/6
";

    fn raw(date: &str, time: Option<&str>, impact: &str) -> RawEvent {
        RawEvent {
            title: "Event".to_string(),
            country: None,
            date: date.to_string(),
            time: time.map(str::to_string),
            impact: Impact::from_label(impact),
        }
    }

    #[test]
    fn combines_date_and_time_into_utc_instant() {
        let rec = normalize_event(&raw("09-29-2025", Some("7:00am"), "High")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 9, 29)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();
        assert_eq!(rec.timestamp, expected);
        assert_eq!(rec.timestamp, 1_759_129_200);
        assert_eq!(rec.severity, Severity::HIGH);
    }

    #[test]
    fn pm_and_uppercase_markers_parse() {
        let pm = normalize_event(&raw("09-29-2025", Some("2:30pm"), "Low")).unwrap();
        assert_eq!(pm.time, NaiveTime::from_hms_opt(14, 30, 0));
        let upper = normalize_event(&raw("09-29-2025", Some("12:15AM"), "Low")).unwrap();
        assert_eq!(upper.time, NaiveTime::from_hms_opt(0, 15, 0));
    }

    #[test]
    fn untimed_rows_kept_at_midnight() {
        let rec = normalize_event(&raw("10-01-2025", Some("All Day"), "Holiday")).unwrap();
        assert!(rec.is_untimed());
        assert_eq!(rec.severity, Severity::HOLIDAY);
        assert_eq!(
            rec.timestamp,
            combine_timestamp(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(), None)
        );

        let empty = normalize_event(&raw("10-01-2025", None, "Holiday")).unwrap();
        assert!(empty.is_untimed());
    }

    #[test]
    fn bad_date_or_clock_is_dropped() {
        assert_eq!(
            normalize_event(&raw("2025/09/30", Some("8:30am"), "Low")),
            Err(DropReason::InvalidDate("2025/09/30".to_string()))
        );
        assert_eq!(
            normalize_event(&raw("09-30-2025", Some("25:00pm"), "Low")),
            Err(DropReason::InvalidTime("25:00pm".to_string()))
        );
        assert_eq!(normalize_event(&raw("", Some("8:30am"), "Low")), Err(DropReason::MissingDate));
    }

    #[test]
    fn feed_counts_add_up() {
        let feed = normalize_feed(FEED).unwrap();
        assert_eq!(feed.rows_read, 6);
        assert_eq!(feed.dropped.len(), 2);
        assert_eq!(feed.records.len(), feed.rows_read - feed.dropped.len());
        assert_eq!(feed.untimed_count(), 2);

        let lines: Vec<usize> = feed.dropped.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![5, 6]);

        let tentative = feed.records.iter().find(|r| r.title == "Tentative Thing").unwrap();
        assert_eq!(tentative.severity, Severity::LOW);
    }

    #[test]
    fn header_with_bom_and_case_differences() {
        let body = "\u{feff}TITLE,date,Time,IMPACT\nCPI,09-29-2025,7:00am,High\n";
        let feed = normalize_feed(body).unwrap();
        assert_eq!(feed.records.len(), 1);
        assert_eq!(feed.records[0].title, "CPI");
    }

    #[test]
    fn missing_impact_column_is_feed_error() {
        let err = normalize_feed("Title,Date,Time\nCPI,09-29-2025,7:00am\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Feed);
        assert!(err.to_string().contains("impact"));
    }

    #[test]
    fn empty_body_is_feed_error() {
        // No header at all: reported as a feed-shape problem, not an empty result.
        let err = normalize_feed("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Feed);
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn short_rows_do_not_abort() {
        let body = "Title,Date,Time,Impact\nCPI,09-29-2025\nGDP,09-30-2025,8:30am,High\n";
        let feed = normalize_feed(body).unwrap();
        // Short row has no time cell -> untimed, impact empty -> unrecognized.
        assert_eq!(feed.records.len(), 2);
        assert!(feed.records[0].is_untimed());
        assert_eq!(feed.records[0].severity, Severity::LOW);
    }

    #[test]
    fn daily_aggregation_takes_max_severity() {
        let records = vec![
            normalize_event(&raw("09-30-2025", Some("8:30am"), "Low")).unwrap(),
            normalize_event(&raw("09-29-2025", Some("9:00am"), "Medium")).unwrap(),
            normalize_event(&raw("09-30-2025", Some("2:00pm"), "High")).unwrap(),
        ];
        let daily = aggregate_daily(&records);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2025, 9, 29).unwrap());
        assert_eq!(daily[0].severity, Severity::MEDIUM);
        assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        assert_eq!(daily[1].severity, Severity::HIGH);
        assert_eq!(daily[1].events, 2);
        assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
    }
}
