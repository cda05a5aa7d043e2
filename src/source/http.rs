//! HTTP feed source implementation.
//!
//! Performs a single `GET` against the configured endpoint and hands the
//! body to the JSON decoder.  No retries; the only timeout is the one set on
//! the client.

use std::time::Duration;

use super::{decode, FeedFetcher, FeedRecord, FetchError};

/// The endpoint the app talks to unless `--url` overrides it.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/AxxessTech/Mobile-Projects/master/challenge.json";

/// A JSON feed fetched over HTTP.
pub struct HttpFeedSource {
    /// The feed URL to fetch.
    pub url: String,
    client: reqwest::blocking::Client,
}

impl HttpFeedSource {
    /// Create a new HTTP source.
    ///
    /// The blocking client owns its own runtime internally, so this must not
    /// be called from inside an async context.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("userfeeds/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Parse an already-fetched response body into records.
    ///
    /// Pure (no I/O) so tests can exercise the payload rules without a
    /// server.
    pub fn parse_body(body: &[u8]) -> Result<Vec<FeedRecord>, FetchError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        decode::decode_payload(value)
    }
}

impl FeedFetcher for HttpFeedSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<FeedRecord>, FetchError> {
        tracing::debug!(url = %self.url, "fetching feed");
        let body = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .bytes()?;

        let records = Self::parse_body(&body)?;
        tracing::info!(count = records.len(), bytes = body.len(), "feed fetched");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
