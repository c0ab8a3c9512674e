//! Upstream data sources.

pub mod feed;

pub use feed::{DEFAULT_FEED_URL, FeedClient};
