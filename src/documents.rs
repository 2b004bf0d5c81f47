//! Document endpoints.

use crate::database::Database;
use crate::encode::path_segment;
use crate::error::{ErrorKind, Result};
use crate::transport::Transport;
use serde_json::Value;

impl<T: Transport> Database<T> {
    fn document_path(&self, docid: &str) -> Result<String> {
        self.ensure_open()?;
        let docid = path_segment(docid, ErrorKind::Document)?;
        Ok(self.path(&format!("/docs/{}", docid)))
    }

    /// Fetch a stored document.
    pub async fn document(&self, docid: &str) -> Result<Value> {
        self.get(&self.document_path(docid)?, ErrorKind::Document)
            .await
    }

    /// Add a document, or replace the one stored under `docid`.
    ///
    /// Without a `docid` (or with an empty one) the server mints one; it is only reported inside the
    /// returned body, see [`assigned_document_id`](crate::types::assigned_document_id).
    /// The body is returned unchanged.
    pub async fn add_document(&self, document: &Value, docid: Option<&str>) -> Result<Value> {
        let path = match docid.filter(|id| !id.is_empty()) {
            Some(id) => self.document_path(id)?,
            None => self.path("/docs"),
        };
        self.post(&path, document, ErrorKind::Document).await
    }

    /// Delete a document.
    pub async fn delete_document(&self, docid: &str) -> Result<()> {
        self.delete_resource(&self.document_path(docid)?, ErrorKind::Document)
            .await?;
        Ok(())
    }
}
