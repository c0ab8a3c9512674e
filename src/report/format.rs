//! Terminal output for `preview` and `next-run`.
//!
//! Formatting lives here so the pipeline stays free of presentation code.

use chrono::{DateTime, Utc};

use crate::io::ingest::{NormalizedFeed, aggregate_daily};
use crate::schedule::Schedule;

/// Summary of a normalized feed: counts plus a per-day severity table.
pub fn format_feed_summary(feed: &NormalizedFeed, source: &str, show_dropped: bool) -> String {
    let mut out = String::new();

    out.push_str("=== econcal - feed preview ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: {} read, {} kept ({} untimed), {} dropped\n",
        feed.rows_read,
        feed.records.len(),
        feed.untimed_count(),
        feed.dropped.len()
    ));

    let daily = aggregate_daily(&feed.records);
    if daily.is_empty() {
        out.push_str("\nNothing to save.\n");
    } else {
        out.push_str("\n  Date        Events  Severity\n");
        out.push_str("  ----------  ------  --------\n");
        for agg in &daily {
            out.push_str(&format!(
                "  {}  {:>6}  {:>8}\n",
                agg.date.format("%Y-%m-%d"),
                agg.events,
                agg.severity.value()
            ));
        }
    }

    if show_dropped && !feed.dropped.is_empty() {
        out.push_str("\nDropped rows:\n");
        for row in &feed.dropped {
            out.push_str(&format!(
                "  line {:>4}  {}  ({})\n",
                row.line,
                row.title.as_deref().unwrap_or("-"),
                row.reason
            ));
        }
    }

    out
}

pub fn format_next_run(schedule: &Schedule, now: DateTime<Utc>) -> String {
    let next = schedule
        .next_run(now)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    format!("Schedule: {}\nNext run: {next}\n", schedule.describe())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::io::ingest::normalize_feed;

    #[test]
    fn summary_lists_days_and_drops() {
        let feed = normalize_feed(
            "Title,Date,Time,Impact\nCPI,09-29-2025,7:00am,High\nNFP,09-29-2025,8:30am,Low\nOops,13-45-2025,,Low\n",
        )
        .unwrap();
        let text = format_feed_summary(&feed, "test", true);
        assert!(text.contains("Rows: 3 read, 2 kept (0 untimed), 1 dropped"));
        assert!(text.contains("  2025-09-29       2         3\n"));
        assert!(text.contains("line    4  Oops"));
    }

    #[test]
    fn next_run_is_rfc3339() {
        let now = Utc.with_ymd_and_hms(2025, 10, 4, 12, 0, 0).unwrap();
        let text = format_next_run(&Schedule::default(), now);
        assert!(text.contains("Mon, Thu at 06:00 UTC"));
        assert!(text.contains("2025-10-06T06:00:00+00:00"));
    }
}
