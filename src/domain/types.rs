//! Shared domain types.
//!
//! Everything here is transient: built from one feed body, written out, and
//! dropped at the end of the run.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Numeric urgency on the charting scale (0..=3).
///
/// Only constructible through [`Impact::severity`], so the range holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const HOLIDAY: Severity = Severity(0);
    pub const LOW: Severity = Severity(1);
    pub const MEDIUM: Severity = Severity(2);
    pub const HIGH: Severity = Severity(3);

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Categorical impact label from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Impact {
    High,
    Medium,
    Low,
    Holiday,
    /// Any label outside the known set (kept verbatim for reporting).
    Other(String),
}

impl Impact {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "High" => Impact::High,
            "Medium" => Impact::Medium,
            "Low" => Impact::Low,
            "Holiday" => Impact::Holiday,
            other => Impact::Other(other.to_string()),
        }
    }

    /// Unrecognized labels map to `LOW` rather than failing the row.
    pub fn severity(&self) -> Severity {
        match self {
            Impact::High => Severity::HIGH,
            Impact::Medium => Severity::MEDIUM,
            Impact::Low => Severity::LOW,
            Impact::Holiday => Severity::HOLIDAY,
            Impact::Other(_) => Severity::LOW,
        }
    }
}

/// One row of the upstream feed, before any parsing of date/time.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub title: String,
    pub country: Option<String>,
    pub date: String,
    /// `None` when the cell is empty (all-day / holiday rows).
    pub time: Option<String>,
    pub impact: Impact,
}

/// A row that survived date/time parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub title: String,
    pub country: Option<String>,
    pub date: NaiveDate,
    /// `None` for untimed (all-day) events.
    pub time: Option<NaiveTime>,
    /// Seconds since the Unix epoch; untimed events sit at 00:00 of `date`.
    pub timestamp: i64,
    pub severity: Severity,
}

impl NormalizedRecord {
    pub fn is_untimed(&self) -> bool {
        self.time.is_none()
    }
}

/// One synthesized bar per calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Maximum severity among the date's events.
    pub severity: Severity,
    /// Number of events folded into this bar.
    pub events: usize,
}

/// Which series file layout to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// One headerless row per calendar date (`YYYYMMDDT,o,h,l,c,v`).
    Daily,
    /// One row per event keyed by epoch seconds, with a header row.
    Events,
}

impl OutputShape {
    pub fn display_name(self) -> &'static str {
        match self {
            OutputShape::Daily => "daily",
            OutputShape::Events => "events",
        }
    }
}

/// Run statistics written next to the series file.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub last_updated: DateTime<Utc>,
    pub shape: OutputShape,
    /// Events that survived normalization.
    pub events_count: usize,
    /// Rows actually written to the series file.
    pub records_count: usize,
    pub dropped_count: usize,
    pub schedule: String,
    pub next_update: Option<DateTime<Utc>>,
}

/// Series descriptor read by the charting application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub symbol: String,
    pub description: String,
    pub pricescale: u32,
}

impl Default for SeriesDescriptor {
    fn default() -> Self {
        Self {
            symbol: "ECONOMIC_CALENDAR".to_string(),
            description: "Economic calendar event impact (0=holiday, 1=low, 2=medium, 3=high)"
                .to_string(),
            pricescale: 1,
        }
    }
}

/// A full update run's configuration as understood by the pipeline.
///
/// Derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub feed_url: String,
    pub shape: OutputShape,
    pub series_path: PathBuf,
    pub metadata_path: PathBuf,
    /// `None` disables the descriptor document.
    pub descriptor_path: Option<PathBuf>,
    pub descriptor: SeriesDescriptor,
    pub schedule: crate::schedule::Schedule,
}
