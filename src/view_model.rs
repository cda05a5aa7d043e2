//! Display-ready projections of feed records.
//!
//! View models are rebuilt from records on every sync and never persisted.

use crate::source::{FeedKind, FeedRecord};

/// Separator between type and date in the subtitle.
const BULLET: &str = "\u{2022}";

/// What the list and detail views draw for one record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedViewModel {
    pub title: String,
    pub subtitle: String,
    pub kind: FeedKind,
}

impl FeedViewModel {
    pub fn from_record(record: &FeedRecord) -> Self {
        let subtitle = match record.date.as_deref() {
            Some(date) if !date.is_empty() => format!("{} {BULLET} {date}", record.kind_tag),
            _ => record.kind_tag.clone(),
        };

        Self {
            title: record.id.clone(),
            subtitle,
            kind: record.kind(),
        }
    }
}

/// Project `records` into view models off the calling thread.
///
/// Runs on the tokio blocking pool; output order equals input order.
pub async fn build(records: Vec<FeedRecord>) -> Vec<FeedViewModel> {
    let count = records.len();
    let built = tokio::task::spawn_blocking(move || {
        records.iter().map(FeedViewModel::from_record).collect::<Vec<_>>()
    })
    .await;

    match built {
        Ok(view_models) => view_models,
        Err(e) => {
            // Only reachable if the mapping itself panicked.
            tracing::error!(error = %e, count, "view model construction failed");
            Vec::new()
        }
    }
}
