//! Recording stub transport for unit tests.

use crate::database::Database;
use crate::error::TransportError;
use crate::transport::{Reply, Transport};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One call seen by [`StubTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Answers calls from a queue of scripted replies, or, in echo mode, stores
/// POST/PUT bodies by path and hands them back on GET.
#[derive(Default)]
pub struct StubTransport {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Reply>>,
    store: Mutex<HashMap<String, Value>>,
    echo: bool,
}

impl StubTransport {
    /// Replies are taken in order; an exhausted queue answers `200 null`.
    pub fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Accept every call with `200 null`.
    pub fn accepting() -> Self {
        Self::scripted([])
    }

    /// Store written bodies and return them on GET of the same path.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    fn answer(&self, method: &'static str, path: &str, body: Option<&Value>) -> Reply {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        if self.echo {
            let mut store = self.store.lock().unwrap();
            return match (method, body) {
                ("GET", _) => match store.get(path) {
                    Some(v) => Reply::ok(v.clone()),
                    None => Reply::failure(404, format!("{} not found", path)),
                },
                (_, Some(b)) => {
                    store.insert(path.to_string(), b.clone());
                    Reply::ok(Value::Null)
                }
                _ => match store.remove(path) {
                    Some(_) => Reply::ok(Value::Null),
                    None => Reply::failure(404, format!("{} not found", path)),
                },
            };
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::ok(Value::Null))
    }
}

impl Transport for StubTransport {
    async fn get(&self, path: &str) -> Result<Reply, TransportError> {
        Ok(self.answer("GET", path, None))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Reply, TransportError> {
        Ok(self.answer("POST", path, Some(body)))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Reply, TransportError> {
        Ok(self.answer("PUT", path, Some(body)))
    }

    async fn delete(&self, path: &str) -> Result<Reply, TransportError> {
        Ok(self.answer("DELETE", path, None))
    }
}

/// A transport whose every call fails before reaching the service.
pub struct UnreachableTransport;

impl Transport for UnreachableTransport {
    async fn get(&self, _path: &str) -> Result<Reply, TransportError> {
        Err(TransportError::Config("connection refused".to_string()))
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<Reply, TransportError> {
        Err(TransportError::Config("connection refused".to_string()))
    }

    async fn put(&self, _path: &str, _body: &Value) -> Result<Reply, TransportError> {
        Err(TransportError::Config("connection refused".to_string()))
    }

    async fn delete(&self, _path: &str) -> Result<Reply, TransportError> {
        Err(TransportError::Config("connection refused".to_string()))
    }
}

/// A handle on `mydb` over `transport`, plus the shared transport for
/// inspecting calls.
pub fn open(transport: StubTransport) -> (Arc<StubTransport>, Database<StubTransport>) {
    let transport = Arc::new(transport);
    let db = Database::new(Arc::clone(&transport), "mydb");
    (transport, db)
}
