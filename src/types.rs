//! Public types for the Flax client.
//!
//! Field descriptors and document bodies stay as [`serde_json::Value`]: the
//! schema belongs to the server. The typed views here are opt-in readers over
//! those values.

use crate::error::{FlaxError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Range;

/// The window of ranked matches to return: offsets `start..end`, end
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankWindow {
    pub start: u32,
    pub end: u32,
}

impl RankWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of matches the window can hold.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The window immediately following this one, with the same size.
    pub fn next_page(&self) -> Self {
        let len = self.len();
        Self::new(self.end, self.end.saturating_add(len))
    }
}

impl Default for RankWindow {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

impl From<Range<u32>> for RankWindow {
    fn from(range: Range<u32>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for RankWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Whether a [`Database`](crate::Database) handle may still be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseState {
    #[default]
    Open,
    /// Deleted through this handle. Terminal.
    Deleted,
}

/// Options for [`FlaxClient::create_database_with_options`](crate::FlaxClient::create_database_with_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateOptions {
    /// Replace an existing database of the same name.
    pub overwrite: bool,
    /// Open an existing database of the same name instead of failing.
    pub reopen: bool,
}

impl CreateOptions {
    /// Wire form: booleans are sent as `0`/`1`.
    pub(crate) fn to_body(self) -> Value {
        serde_json::json!({
            "overwrite": u8::from(self.overwrite),
            "reopen": u8::from(self.reopen),
        })
    }
}

/// A page of ranked matches as returned by both search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub matches_estimated: u64,
    pub matches_lower_bound: u64,
    pub matches_upper_bound: u64,
    pub matches_human_readable_estimate: Value,
    pub estimate_is_exact: bool,
    pub more_matches: bool,
    pub start_rank: u32,
    pub end_rank: u32,
    pub results: Vec<SearchHit>,
}

impl SearchResults {
    /// Read a search response body.
    ///
    /// Missing keys take their defaults; a body of the wrong shape is a
    /// [`FlaxError::Document`].
    pub fn from_value(value: Value) -> Result<Self> {
        // Derived struct deserializers also accept sequences, filling fields
        // by position; only maps are valid here.
        match &value {
            Value::Object(map) => {
                if let Some(Value::Array(hits)) = map.get("results") {
                    if let Some(hit) = hits.iter().find(|h| !h.is_object()) {
                        return Err(invalid_search_response(format!(
                            "expected a hit object, got {}",
                            hit
                        )));
                    }
                }
            }
            other => {
                return Err(invalid_search_response(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        }
        serde_json::from_value(value).map_err(|e| invalid_search_response(e.to_string()))
    }
}

fn invalid_search_response(detail: String) -> FlaxError {
    FlaxError::Document(format!("Invalid search response: {}", detail))
}

/// A single ranked match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub docid: String,
    pub rank: u32,
    pub weight: f64,
    /// Database the hit came from, as the server names it.
    pub db: String,
    /// Stored field values, keyed by field name.
    pub data: Value,
}

/// Key under which the service reports a minted document id.
pub const ASSIGNED_ID_KEY: &str = "docid";

/// Read the server-assigned id from an `add_document` response body.
///
/// Looks at [`ASSIGNED_ID_KEY`] first, then `id`. Numeric ids are rendered
/// as strings.
pub fn assigned_document_id(body: &Value) -> Option<String> {
    [ASSIGNED_ID_KEY, "id"].iter().find_map(|key| match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
