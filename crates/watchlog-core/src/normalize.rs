//! Response-shape normalization.
//!
//! Some deployments of the movie API key their records by `_id` (Mongo
//! style) instead of the canonical `id`. The convention is selected from
//! configuration at startup and applied by the request wrapper before
//! deserialization, so typed consumers only ever see `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope fields known to carry a nested record.
const NESTED_RECORD_FIELDS: &[&str] = &["movie", "user"];

/// Primary-key convention of the backend's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdField {
    /// Records already use `id`; nothing to rewrite.
    #[default]
    Canonical,
    /// Records use `_id`; rewrite to `id` recursively.
    Mongo,
}

impl IdField {
    /// Normalize a response body in place.
    pub fn normalize(self, value: &mut Value) {
        if self == IdField::Mongo {
            rewrite(value);
        }
    }
}

/// Rewrite `_id` to `id` on a record, descending into arrays of records and
/// the known nested envelope fields. An existing `id` is never clobbered.
fn rewrite(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(rewrite),
        Value::Object(map) => {
            if !map.contains_key("id") {
                if let Some(id) = map.remove("_id") {
                    map.insert("id".to_string(), id);
                }
            }
            for key in NESTED_RECORD_FIELDS {
                if let Some(nested) = map.get_mut(*key) {
                    rewrite(nested);
                }
            }
        }
        _ => {}
    }
}
