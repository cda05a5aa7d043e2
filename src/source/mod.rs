//! Feed source abstraction layer.
//!
//! This module defines the [`FeedFetcher`] trait, the [`FeedRecord`] type, and
//! the error a fetch can produce.  The concrete HTTP implementation lives in
//! [`http`]; payload decoding lives in [`decode`].
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `file.rs`).
//! 2. Define a struct and implement [`FeedFetcher`] for it.
//! 3. Add `mod file;` below and re-export your struct in the `pub use` block.
//! 4. Construct an instance in `main.rs` and hand it to the sync controller.
//!
//! The sync controller, cache, and UI are all source-agnostic.

pub mod decode;
mod feed_record;
mod http;

// Re-export the public API of this module so callers can write
// `use crate::source::{FeedFetcher, FeedRecord, HttpFeedSource};`
pub use feed_record::{FeedKind, FeedRecord};
pub use http::{HttpFeedSource, DEFAULT_FEED_URL};

/// Why a fetch produced no records.
///
/// Every variant sends the sync controller down the cache fallback path.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or a non-success HTTP status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Valid JSON, but not an array of objects.
    #[error("unexpected payload: expected an array of objects")]
    UnexpectedPayload,
}

/// Trait that every feed source must implement.
///
/// The sync controller calls [`fetch()`](FeedFetcher::fetch) on a background
/// thread, so implementations must be [`Send`] + [`Sync`].  Overlapping calls
/// are not deduplicated: each one does its own round trip.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// impl FeedFetcher for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     fn fetch(&self) -> Result<Vec<FeedRecord>, FetchError> {
///         // Perform I/O, then decode into FeedRecord values.
///         todo!()
///     }
/// }
/// ```
pub trait FeedFetcher: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Fetch the latest batch of records.
    fn fetch(&self) -> Result<Vec<FeedRecord>, FetchError>;
}
