//! Economic-calendar feed fetcher.

use reqwest::blocking::Client;

use crate::error::{AppError, ErrorKind};

pub const DEFAULT_FEED_URL: &str = "https://nfs.faireconomy.media/ff_calendar_thisweek.csv";

pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Single GET of the feed; the body is returned untouched.
    ///
    /// No retry: a failed fetch aborts the run and the scheduler decides
    /// whether to try again later.
    pub fn fetch_text(&self) -> Result<String, AppError> {
        tracing::info!(url = %self.url, "fetching calendar feed");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Feed request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::new(
                ErrorKind::Fetch,
                format!("Feed request failed with status {status}."),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(ErrorKind::Fetch, format!("Failed to read feed body: {e}")))?;

        tracing::debug!(bytes = body.len(), "feed body received");
        Ok(body)
    }
}
