//! Shared "update pipeline" logic used by the `update` and `preview` commands.
//!
//! feed fetch -> normalize -> (daily aggregation) -> series + metadata + descriptor
//!
//! Nothing is written unless normalization leaves at least one row to save.

use chrono::{DateTime, Utc};

use crate::data::FeedClient;
use crate::domain::{OutputShape, RunMetadata, UpdateConfig};
use crate::error::AppError;
use crate::io::ingest::{NormalizedFeed, aggregate_daily, normalize_feed};

/// What a successful update produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub feed: NormalizedFeed,
    pub records_written: usize,
    pub metadata: RunMetadata,
}

/// Fetch the feed and normalize it without writing anything.
pub fn fetch_normalized(feed_url: &str) -> Result<NormalizedFeed, AppError> {
    let body = FeedClient::new(feed_url).fetch_text()?;
    normalize_feed(&body)
}

/// Execute the full update: fetch, normalize, write.
pub fn run_update(config: &UpdateConfig) -> Result<RunSummary, AppError> {
    let body = FeedClient::new(&config.feed_url).fetch_text()?;
    run_update_with_body(config, &body, Utc::now())
}

/// Execute the update with a pre-fetched feed body.
///
/// `now` stamps the metadata and anchors the next-run estimate.
pub fn run_update_with_body(
    config: &UpdateConfig,
    body: &str,
    now: DateTime<Utc>,
) -> Result<RunSummary, AppError> {
    let feed = normalize_feed(body)?;
    tracing::info!(
        rows = feed.rows_read,
        kept = feed.records.len(),
        dropped = feed.dropped.len(),
        untimed = feed.untimed_count(),
        "normalized feed"
    );

    // The writers refuse empty input before touching any path.
    let records_written = match config.shape {
        OutputShape::Events => crate::io::export::write_events_csv(&config.series_path, &feed.records)?,
        OutputShape::Daily => {
            let daily = aggregate_daily(&feed.records);
            crate::io::export::write_daily_csv(&config.series_path, &daily)?
        }
    };

    let metadata = RunMetadata {
        last_updated: now,
        shape: config.shape,
        events_count: feed.records.len(),
        records_count: records_written,
        dropped_count: feed.dropped.len(),
        schedule: config.schedule.describe(),
        next_update: config.schedule.next_run(now),
    };
    crate::io::metadata::write_metadata_json(&config.metadata_path, &metadata)?;

    if let Some(path) = &config.descriptor_path {
        crate::io::metadata::write_descriptor_json(path, &config.descriptor)?;
    }

    tracing::info!(
        shape = config.shape.display_name(),
        records = records_written,
        "update completed"
    );

    Ok(RunSummary {
        feed,
        records_written,
        metadata,
    })
}
