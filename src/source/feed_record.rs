//! The core data type shared by the fetcher, the cache and the view models.
//!
//! `FeedRecord` is one entry exactly as the remote feed describes it.  The
//! network source decodes it from JSON, the local store persists it, and the
//! view-model builder projects it into something the UI can draw.
//!
//! ## For contributors
//!
//! Records are plain owned values: they can be sent across threads, cloned
//! into the cache writer, and compared in tests.  Do not add interior
//! mutability here; a record is superseded wholesale on the next sync.

use serde::{Deserialize, Serialize};

/// A single feed entry as delivered by the remote endpoint.
///
/// ## The `type` field
///
/// The wire format calls the discriminator `type`, which is a Rust keyword,
/// so it is stored as [`kind_tag`](FeedRecord::kind_tag).  Any string is
/// accepted; values other than `"text"` and `"image"` classify as
/// [`FeedKind::Other`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Label shown as the item title.  Not required to be unique.
    pub id: String,

    /// Raw type discriminator from the feed (`"text"`, `"image"`, ...).
    #[serde(rename = "type")]
    pub kind_tag: String,

    /// Payload: the text body, or the image URL for image records.
    #[serde(default)]
    pub data: Option<String>,

    /// Free-form date string, displayed as-is.
    #[serde(default)]
    pub date: Option<String>,
}

/// Derived classification of a record's payload.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FeedKind {
    /// Text body, trimmed of surrounding whitespace.
    Text(Option<String>),
    /// Image URL, kept verbatim.
    Image(Option<String>),
    /// Catch-all for unknown types, trimmed like text.
    Other(Option<String>),
}

impl FeedRecord {
    /// Classify this record by its `type` tag.
    pub fn kind(&self) -> FeedKind {
        match self.kind_tag.as_str() {
            "text" => FeedKind::Text(trimmed(&self.data)),
            // URLs are passed through untouched.
            "image" => FeedKind::Image(self.data.clone()),
            _ => FeedKind::Other(trimmed(&self.data)),
        }
    }
}

fn trimmed(data: &Option<String>) -> Option<String> {
    data.as_deref().map(|s| s.trim().to_string())
}

impl FeedKind {
    /// The payload carried by this kind, whatever the variant.
    pub fn payload(&self) -> Option<&str> {
        match self {
            FeedKind::Text(s) | FeedKind::Image(s) | FeedKind::Other(s) => s.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
