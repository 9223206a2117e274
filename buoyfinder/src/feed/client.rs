//! SPOT feed client.
//!
//! The [`FeedClient`] trait abstracts over the satellite feed backend so
//! the service and tests can swap in mock feeds. [`SpotFeedClient`]
//! fetches the SPOT public feed JSON API via `reqwest`, one page at a
//! time; [`fetch_all_reports`] drives the pagination loop.

use std::future::Future;
use std::time::Duration;

use super::model::{FeedEnvelope, PositionReport};
use super::FeedError;

/// Default base URL of the SPOT public feed API.
pub const DEFAULT_BASE_URL: &str =
    "https://api.findmespot.com/spot-main-web/consumer/rest-api/2.0/public/feed";

/// Messages per page; the API serves at most 50.
pub const PAGE_SIZE: i64 = 50;

/// Default HTTP timeout for a single page fetch.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// One decoded page of position reports.
#[derive(Debug)]
pub struct FeedPage {
    /// Reports on this page, in feed order (newest first).
    pub reports: Vec<PositionReport>,
    /// Number of messages the API says this page holds.
    pub count: i64,
    /// Total messages available across all pages.
    pub total_count: i64,
}

/// Trait for fetching pages of position reports from a satellite feed.
pub trait FeedClient: Send + Sync {
    /// Fetch one page of reports starting at the given message offset.
    fn fetch_page(&self, start: i64) -> impl Future<Output = Result<FeedPage, FeedError>> + Send;
}

/// Fetch the complete report window, following pagination until a short
/// page or the advertised total is reached.
pub async fn fetch_all_reports<C: FeedClient>(client: &C) -> Result<Vec<PositionReport>, FeedError> {
    let mut all = Vec::new();
    let mut start = 0;
    loop {
        let page = client.fetch_page(start).await?;
        let fetched = page.reports.len() as i64;
        all.extend(page.reports);
        start += fetched;
        if fetched < PAGE_SIZE || start >= page.total_count {
            break;
        }
    }

    tracing::debug!(total_reports = all.len(), "Feed fetch complete");
    Ok(all)
}

/// SPOT public feed client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and a
/// per-request timeout.
pub struct SpotFeedClient {
    /// Reusable HTTP client.
    http: reqwest::Client,
    /// Feed API base URL, without trailing slash.
    base_url: String,
    /// Public feed id (glid).
    feed_id: String,
}

impl SpotFeedClient {
    /// Create a new client for the given feed.
    pub fn new(base_url: &str, feed_id: &str, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            feed_id: feed_id.to_string(),
        })
    }

    /// The message endpoint URL for a given page offset.
    fn page_url(&self, start: i64) -> String {
        format!(
            "{}/{}/message.json?count={}&start={}",
            self.base_url, self.feed_id, PAGE_SIZE, start
        )
    }
}

impl FeedClient for SpotFeedClient {
    async fn fetch_page(&self, start: i64) -> Result<FeedPage, FeedError> {
        let url = self.page_url(start);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        let envelope: FeedEnvelope = serde_json::from_slice(&bytes)?;

        let page = page_from_envelope(envelope)?;
        tracing::debug!(
            start,
            count = page.count,
            total_count = page.total_count,
            "SPOT feed page fetched"
        );
        Ok(page)
    }
}

/// Convert a decoded envelope into a page, surfacing API-level errors.
fn page_from_envelope(envelope: FeedEnvelope) -> Result<FeedPage, FeedError> {
    let response = envelope.response;

    if let Some(errors) = response.errors {
        let error = errors.error.unwrap_or_default();
        return Err(FeedError::Api {
            code: error.code,
            text: error.text,
            description: error.description,
        });
    }

    let page = response.feed_message_response.ok_or(FeedError::MissingPage)?;
    let reports = page
        .messages
        .map(|m| m.message)
        .unwrap_or_default()
        .into_iter()
        .map(PositionReport::from_raw)
        .collect();

    Ok(FeedPage {
        reports,
        count: page.count,
        total_count: page.total_count,
    })
}
