//! JSON payload decoding.
//!
//! The endpoint is expected to return an array of objects.  Anything else is
//! rejected as a whole; inside a well-shaped array every object is decoded on
//! its own so one bad entry cannot take down the batch.

use serde_json::{Map, Value};

use super::{FeedRecord, FetchError};

/// Check the payload shape and decode it.
///
/// Returns [`FetchError::UnexpectedPayload`] unless `value` is an array whose
/// elements are all JSON objects.
pub fn decode_payload(value: Value) -> Result<Vec<FeedRecord>, FetchError> {
    let Value::Array(items) = value else {
        return Err(FetchError::UnexpectedPayload);
    };

    let objects = items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(FetchError::UnexpectedPayload),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(decode(objects))
}

/// Decode raw objects into records, eliding the ones that fail.
///
/// Output order equals input order.
pub fn decode(raw_items: Vec<Map<String, Value>>) -> Vec<FeedRecord> {
    raw_items
        .into_iter()
        .enumerate()
        .filter_map(|(index, map)| {
            match serde_json::from_value::<FeedRecord>(Value::Object(map)) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "dropping malformed feed item");
                    None
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
