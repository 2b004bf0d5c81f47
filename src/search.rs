//! Search endpoints.
//!
//! Covers: simple (free-text) and structured (boolean + filters) search.
//! Both return the service's result body unchanged; see
//! [`SearchResults`](crate::types::SearchResults) for a typed view.

use crate::database::Database;
use crate::error::{ErrorKind, Result};
use crate::query::{SimpleQuery, StructuredQuery};
use crate::transport::Transport;
use crate::types::RankWindow;
use serde_json::Value;

impl<T: Transport> Database<T> {
    /// Free-text search over all indexed content.
    ///
    /// ```no_run
    /// # async fn example(db: flax_client::Database) -> flax_client::error::Result<()> {
    /// let first_page = db.search_simple("dark matter", 0..10).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_simple(
        &self,
        query: &str,
        window: impl Into<RankWindow>,
    ) -> Result<Value> {
        self.search_simple_query(&SimpleQuery::new(query).window(window))
            .await
    }

    /// Free-text search from a prepared [`SimpleQuery`].
    pub async fn search_simple_query(&self, query: &SimpleQuery) -> Result<Value> {
        let path = self.path(&format!("/search/simple?{}", query.to_query_string()));
        self.get(&path, ErrorKind::Document).await
    }

    /// Structured search: required, optional and excluded terms, an exact
    /// phrase, and exact-match filters.
    pub async fn search_structured(&self, query: &StructuredQuery) -> Result<Value> {
        let path = self.path(&format!("/search/structured?{}", query.to_query_string()));
        self.get(&path, ErrorKind::Document).await
    }

    /// Structured search with every part given positionally.
    ///
    /// `filters` are `(field, value)` pairs, applied conjunctively in order.
    #[allow(clippy::too_many_arguments)]
    pub async fn search_structured_terms(
        &self,
        query_all: &str,
        query_any: &str,
        query_none: &str,
        query_phrase: &str,
        filters: &[(&str, &str)],
        start_rank: u32,
        end_rank: u32,
    ) -> Result<Value> {
        let query = filters.iter().fold(
            StructuredQuery::new()
                .all(query_all)
                .any(query_any)
                .none(query_none)
                .phrase(query_phrase)
                .window(start_rank..end_rank),
            |q, (field, value)| q.filter(*field, *value),
        );
        self.search_structured(&query).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FlaxError;
    use crate::query::StructuredQuery;
    use crate::testing::{open, StubTransport};
    use crate::transport::Reply;
    use crate::types::{RankWindow, SearchResults};
    use serde_json::json;

    #[tokio::test]
    async fn test_search_simple_path() {
        let (transport, db) = open(StubTransport::accepting());
        db.search_simple("foo", 0..10).await.unwrap();
        assert_eq!(
            transport.paths(),
            vec!["dbs/mydb/search/simple?query=foo&start_rank=0&end_rank=10"]
        );
        assert_eq!(transport.calls()[0].method, "GET");
    }

    #[tokio::test]
    async fn test_search_simple_encodes_query() {
        let (transport, db) = open(StubTransport::accepting());
        db.search_simple("x-ray & gamma", RankWindow::new(10, 20))
            .await
            .unwrap();
        assert_eq!(
            transport.paths(),
            vec!["dbs/mydb/search/simple?query=x%2Dray+%26+gamma&start_rank=10&end_rank=20"]
        );
    }

    #[tokio::test]
    async fn test_search_structured_path() {
        let (transport, db) = open(StubTransport::accepting());
        db.search_structured_terms(
            "space opera",
            "",
            "romance",
            "desert planet",
            &[("category", "books"), ("lang", "en")],
            0,
            10,
        )
        .await
        .unwrap();
        assert_eq!(
            transport.paths(),
            vec![
                "dbs/mydb/search/structured?start_rank=0&end_rank=10\
                 &query_all=space+opera&query_any=&query_none=romance\
                 &query_phrase=desert+planet&filter=category%3Abooks&filter=lang%3Aen"
            ]
        );
    }

    #[tokio::test]
    async fn test_search_structured_builder_matches_positional() {
        let (transport, db) = open(StubTransport::accepting());
        db.search_structured_terms("a", "b", "c", "d", &[("f", "v")], 5, 15)
            .await
            .unwrap();
        db.search_structured(
            &StructuredQuery::new()
                .all("a")
                .any("b")
                .none("c")
                .phrase("d")
                .filter("f", "v")
                .window(5..15),
        )
        .await
        .unwrap();
        let paths = transport.paths();
        assert_eq!(paths[0], paths[1]);
    }

    #[tokio::test]
    async fn test_search_returns_body_unchanged() {
        let body = json!({
            "matches_estimated": 1,
            "more_matches": false,
            "results": [{"docid": "7", "rank": 0, "weight": 3.2, "db": "mydb", "data": {}}]
        });
        let (_, db) = open(StubTransport::scripted([Reply::ok(body.clone())]));
        let value = db.search_simple("foo", 0..10).await.unwrap();
        assert_eq!(value, body);

        let results = SearchResults::from_value(value).unwrap();
        assert_eq!(results.results[0].docid, "7");
    }

    #[tokio::test]
    async fn test_search_failures_are_document_errors() {
        let (_, db) = open(StubTransport::scripted([
            Reply::failure(400, "bad query"),
            Reply::failure(500, "backend down"),
        ]));
        assert_eq!(
            db.search_simple("(", 0..10).await.unwrap_err(),
            FlaxError::Document("bad query".to_string())
        );
        assert_eq!(
            db.search_structured(&StructuredQuery::new().all("x"))
                .await
                .unwrap_err(),
            FlaxError::Document("backend down".to_string())
        );
    }
}
