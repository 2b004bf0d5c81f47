//! Request/response transport and its reqwest-backed implementation.

use crate::error::{ErrorKind, FlaxError, TransportError};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Base URL used when `FLAX_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Default per-request timeout for [`HttpTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status code the service uses for every successful call.
pub const STATUS_OK: u16 = 200;

/// A status code and payload returned by a [`Transport`].
///
/// On [`STATUS_OK`] `body` is the parsed payload. Otherwise it carries the
/// diagnostic, usually the raw response text as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// A successful reply carrying `body`.
    pub fn ok(body: Value) -> Self {
        Self::new(STATUS_OK, body)
    }

    /// A failed reply carrying a diagnostic message.
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, Value::String(message.into()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The diagnostic text: string bodies verbatim, anything else as JSON.
    pub fn into_message(self) -> String {
        match self.body {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// The four verbs the client needs from an HTTP layer.
///
/// Paths are relative resource paths such as `dbs/mydb/docs/1`, with every
/// dynamic segment already encoded. Implementations own connection handling,
/// timeouts and retries; the client only branches on [`Reply::status`].
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    fn post(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    fn put(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}

/// Turn a transport outcome into a success payload or an error of `kind`.
///
/// Only [`STATUS_OK`] counts as success. Transport failures are reported in
/// the same category as a non-200 reply would be.
pub(crate) fn settle(
    outcome: Result<Reply, TransportError>,
    kind: ErrorKind,
) -> crate::error::Result<Value> {
    match outcome {
        Ok(reply) if reply.is_ok() => Ok(reply.body),
        Ok(reply) => {
            tracing::warn!(%kind, status = reply.status, "request rejected by search service");
            Err(FlaxError::new(kind, reply.into_message()))
        }
        Err(e) => {
            tracing::warn!(%kind, error = %e, "transport failure");
            Err(FlaxError::new(kind, e.to_string()))
        }
    }
}

/// [`Transport`] over HTTP using reqwest.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flax-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Create a transport from the `FLAX_URL` environment variable, falling
    /// back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, TransportError> {
        match std::env::var("FLAX_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    /// The service root all resource paths are joined to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Reply, TransportError> {
        tracing::debug!(method, path, "sending request");
        let response = request.send().await?;
        let reply = read_reply(response).await?;
        tracing::debug!(method, path, status = reply.status, "received reply");
        Ok(reply)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Reply, TransportError> {
        let url = self.url(path)?;
        self.send("GET", path, self.http.get(url)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Reply, TransportError> {
        let url = self.url(path)?;
        self.send("POST", path, self.http.post(url).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Reply, TransportError> {
        let url = self.url(path)?;
        self.send("PUT", path, self.http.put(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Reply, TransportError> {
        let url = self.url(path)?;
        self.send("DELETE", path, self.http.delete(url)).await
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(TransportError::Config(format!(
            "base URL cannot have paths joined to it: {}",
            base_url
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Read the response into a [`Reply`]: JSON on success, raw text otherwise.
async fn read_reply(response: reqwest::Response) -> Result<Reply, TransportError> {
    let status = response.status().as_u16();
    let text = response.text().await?;

    if status != STATUS_OK {
        return Ok(Reply::failure(status, text));
    }

    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text)?
    };
    Ok(Reply::ok(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("http://example.com/flax").unwrap();
        assert_eq!(url.as_str(), "http://example.com/flax/");
        assert_eq!(
            url.join("dbs/a%2Db").unwrap().as_str(),
            "http://example.com/flax/dbs/a%2Db"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn test_reply_message() {
        assert_eq!(Reply::failure(404, "no such db").into_message(), "no such db");
        assert_eq!(
            Reply::new(500, json!({"error": "boom"})).into_message(),
            r#"{"error":"boom"}"#
        );
    }

    #[test]
    fn test_settle_classifies_by_kind() {
        let ok = settle(Ok(Reply::ok(json!([1, 2]))), ErrorKind::Field).unwrap();
        assert_eq!(ok, json!([1, 2]));

        let err = settle(Ok(Reply::failure(500, "oops")), ErrorKind::Document).unwrap_err();
        assert_eq!(err, FlaxError::Document("oops".to_string()));

        let err = settle(
            Err(TransportError::Config("down".to_string())),
            ErrorKind::Field,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
        assert_eq!(err.message(), "Configuration error: down");
    }

    #[test]
    fn test_settle_non_200_success_class_is_failure() {
        let err = settle(Ok(Reply::failure(201, "created")), ErrorKind::Database).unwrap_err();
        assert_eq!(err, FlaxError::Database("created".to_string()));
    }

    #[tokio::test]
    async fn test_get_parses_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/mydb/schema/fields"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["title", "body"])))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let reply = transport.get("dbs/mydb/schema/fields").await.unwrap();
        assert_eq!(reply, Reply::ok(json!(["title", "body"])));
    }

    #[tokio::test]
    async fn test_error_body_forwarded_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Database not found"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let reply = transport.get("dbs/missing").await.unwrap();
        assert_eq!(reply.status, 404);
        assert_eq!(reply.into_message(), "Database not found");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dbs/books"))
            .and(body_json(json!({"overwrite": 1, "reopen": 0})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let reply = transport
            .post("dbs/books", &json!({"overwrite": 1, "reopen": 0}))
            .await
            .unwrap();
        assert_eq!(reply, Reply::ok(Value::Null));
    }

    #[tokio::test]
    async fn test_put_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/dbs/books/schema/fields/title"))
            .and(body_json(json!({"type": "text"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/dbs/books/docs/7"))
            .respond_with(ResponseTemplate::new(500).set_body_string("write failed"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let put = transport
            .put("dbs/books/schema/fields/title", &json!({"type": "text"}))
            .await
            .unwrap();
        assert!(put.is_ok());

        let del = transport.delete("dbs/books/docs/7").await.unwrap();
        assert_eq!(del, Reply::failure(500, "write failed"));
    }

    #[tokio::test]
    async fn test_query_string_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/books/search/simple"))
            .and(query_param("query", "dark matter"))
            .and(query_param("start_rank", "0"))
            .and(query_param("end_rank", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let reply = transport
            .get("dbs/books/search/simple?query=dark+matter&start_rank=0&end_rank=10")
            .await
            .unwrap();
        assert_eq!(reply.body, json!({"results": []}));
    }

    #[tokio::test]
    async fn test_invalid_success_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs/books"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(&server.uri()).unwrap();
        let err = transport.get("dbs/books").await.unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
