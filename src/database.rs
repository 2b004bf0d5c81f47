//! Handle on a single database.
//!
//! Operations are split across modules by resource family:
//! schema fields and commit in [`schema`](crate::schema), documents in
//! [`documents`](crate::documents), and queries in [`search`](crate::search).

use crate::encode::encode_segment;
use crate::error::{ErrorKind, FlaxError, Result};
use crate::transport::{settle, HttpTransport, Transport};
use crate::types::DatabaseState;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A database on the search service, obtained from
/// [`FlaxClient`](crate::FlaxClient).
///
/// The handle caches nothing but its name and whether it has been deleted;
/// the server is authoritative for everything else. Once [`delete`](Self::delete)
/// succeeds, every further call fails with [`FlaxError::Database`] without
/// touching the network.
pub struct Database<T = HttpTransport> {
    transport: Arc<T>,
    name: String,
    state: DatabaseState,
}

impl<T> fmt::Debug for Database<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}

impl<T> fmt::Display for Database<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            DatabaseState::Open => write!(f, "Database[{}]", self.name),
            DatabaseState::Deleted => write!(f, "Database[{} (deleted)]", self.name),
        }
    }
}

impl<T: Transport> Database<T> {
    pub(crate) fn new(transport: Arc<T>, name: impl Into<String>) -> Self {
        Self {
            transport,
            name: name.into(),
            state: DatabaseState::Open,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> DatabaseState {
        self.state
    }

    pub fn is_deleted(&self) -> bool {
        self.state == DatabaseState::Deleted
    }

    /// Delete the database on the server and retire this handle.
    ///
    /// On failure the handle stays open.
    pub async fn delete(&mut self) -> Result<()> {
        self.ensure_open()?;
        let path = self.path("");
        settle(self.transport.delete(&path).await, ErrorKind::Database)?;
        self.state = DatabaseState::Deleted;
        tracing::debug!(db = %self.name, "database deleted");
        Ok(())
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        match self.state {
            DatabaseState::Open => Ok(()),
            DatabaseState::Deleted => Err(FlaxError::deleted()),
        }
    }

    /// `dbs/{db}` followed by `suffix`, which must already be encoded.
    pub(crate) fn path(&self, suffix: &str) -> String {
        format!("dbs/{}{}", encode_segment(&self.name), suffix)
    }

    pub(crate) async fn get(&self, path: &str, kind: ErrorKind) -> Result<Value> {
        self.ensure_open()?;
        settle(self.transport.get(path).await, kind)
    }

    pub(crate) async fn post(&self, path: &str, body: &Value, kind: ErrorKind) -> Result<Value> {
        self.ensure_open()?;
        settle(self.transport.post(path, body).await, kind)
    }

    pub(crate) async fn put(&self, path: &str, body: &Value, kind: ErrorKind) -> Result<Value> {
        self.ensure_open()?;
        settle(self.transport.put(path, body).await, kind)
    }

    pub(crate) async fn delete_resource(&self, path: &str, kind: ErrorKind) -> Result<Value> {
        self.ensure_open()?;
        settle(self.transport.delete(path).await, kind)
    }
}
