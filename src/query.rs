//! Builders for the two search styles.
//!
//! Both produce the query-string half of a search resource path, with every
//! value passed through [`encode_segment`].
//!
//! # Example
//!
//! ```
//! use flax_client::StructuredQuery;
//!
//! let query = StructuredQuery::new()
//!     .all("dark matter")
//!     .none("review")
//!     .filter("lang", "en")
//!     .window(0..20);
//! assert_eq!(
//!     query.to_query_string(),
//!     "start_rank=0&end_rank=20&query_all=dark+matter&query_any=&query_none=review\
//!      &query_phrase=&filter=lang%3Aen"
//! );
//! ```

use crate::encode::encode_segment;
use crate::types::RankWindow;

/// A free-text query over all indexed content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleQuery {
    pub text: String,
    pub window: RankWindow,
}

impl SimpleQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            window: RankWindow::default(),
        }
    }

    /// Set the rank window.
    pub fn window(mut self, window: impl Into<RankWindow>) -> Self {
        self.window = window.into();
        self
    }

    /// Render as `query=..&start_rank=..&end_rank=..`.
    pub fn to_query_string(&self) -> String {
        format!(
            "query={}&start_rank={}&end_rank={}",
            encode_segment(&self.text),
            self.window.start,
            self.window.end
        )
    }
}

/// A boolean query: a match must contain every term of `all`, at least one
/// of `any`, none of `none`, and the exact `phrase`, and must satisfy every
/// exact-match filter.
///
/// Empty groups are sent as empty parameters and ignored by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredQuery {
    pub all: String,
    pub any: String,
    pub none: String,
    pub phrase: String,
    /// `(field, value)` pairs, in the order they are sent.
    pub filters: Vec<(String, String)>,
    pub window: RankWindow,
}

impl StructuredQuery {
    /// Create an empty query with the default window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Terms that must all appear.
    pub fn all(mut self, terms: impl Into<String>) -> Self {
        self.all = terms.into();
        self
    }

    /// Terms of which at least one must appear.
    pub fn any(mut self, terms: impl Into<String>) -> Self {
        self.any = terms.into();
        self
    }

    /// Terms that must not appear.
    pub fn none(mut self, terms: impl Into<String>) -> Self {
        self.none = terms.into();
        self
    }

    /// An exact phrase that must appear.
    pub fn phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = phrase.into();
        self
    }

    /// Add an exact-match filter on `field`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Set the rank window.
    pub fn window(mut self, window: impl Into<RankWindow>) -> Self {
        self.window = window.into();
        self
    }

    /// Render the parameters in the order the service expects. Each filter
    /// becomes one `filter=` parameter, encoded as the unit `field:value`.
    pub fn to_query_string(&self) -> String {
        let mut out = format!(
            "start_rank={}&end_rank={}&query_all={}&query_any={}&query_none={}&query_phrase={}",
            self.window.start,
            self.window.end,
            encode_segment(&self.all),
            encode_segment(&self.any),
            encode_segment(&self.none),
            encode_segment(&self.phrase),
        );
        for (field, value) in &self.filters {
            out.push_str("&filter=");
            out.push_str(&encode_segment(&format!("{}:{}", field, value)));
        }
        out
    }
}
