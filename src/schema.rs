//! Schema field management and commit.
//!
//! Field descriptors are opaque to the client; whatever the caller stores is
//! what the server hands back.

use crate::database::Database;
use crate::encode::path_segment;
use crate::error::{ErrorKind, FlaxError, Result};
use crate::transport::Transport;
use serde_json::Value;

impl<T: Transport> Database<T> {
    fn field_path(&self, field: &str) -> Result<String> {
        self.ensure_open()?;
        let field = path_segment(field, ErrorKind::Field)?;
        Ok(self.path(&format!("/schema/fields/{}", field)))
    }

    /// Names of all fields in the schema.
    pub async fn field_names(&self) -> Result<Vec<String>> {
        let body = self
            .get(&self.path("/schema/fields"), ErrorKind::Field)
            .await?;
        serde_json::from_value(body)
            .map_err(|e| FlaxError::Field(format!("Invalid field list response: {}", e)))
    }

    /// The descriptor of one field.
    pub async fn field(&self, field: &str) -> Result<Value> {
        self.get(&self.field_path(field)?, ErrorKind::Field).await
    }

    /// Add a field to the schema.
    pub async fn add_field(&self, field: &str, descriptor: &Value) -> Result<()> {
        self.post(&self.field_path(field)?, descriptor, ErrorKind::Field)
            .await?;
        Ok(())
    }

    /// Replace the descriptor of an existing field.
    pub async fn replace_field(&self, field: &str, descriptor: &Value) -> Result<()> {
        self.put(&self.field_path(field)?, descriptor, ErrorKind::Field)
            .await?;
        Ok(())
    }

    /// Remove a field from the schema.
    pub async fn delete_field(&self, field: &str) -> Result<()> {
        self.delete_resource(&self.field_path(field)?, ErrorKind::Field)
            .await?;
        Ok(())
    }

    /// Make every pending write durable and visible to searches.
    ///
    /// Failures are reported as [`FlaxError::Field`].
    pub async fn commit(&self) -> Result<()> {
        self.post(&self.path("/flush"), &Value::Bool(true), ErrorKind::Field)
            .await?;
        Ok(())
    }
}
