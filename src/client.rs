//! The Flax search service client.

use crate::database::Database;
use crate::encode::path_segment;
use crate::error::{ErrorKind, FlaxError, Result, TransportError};
use crate::transport::{settle, HttpTransport, Transport};
use crate::types::CreateOptions;
use std::sync::Arc;

/// Entry point to a Flax search service: opens and creates databases.
///
/// Every [`Database`] handle obtained from a client shares its transport.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = flax_client::FlaxClient::from_env()?;
/// let db = client.create_database("books").await?;
/// db.add_document(&serde_json::json!({"title": "Dune"}), Some("dune")).await?;
/// db.commit().await?;
/// let results = db.search_simple("dune", 0..10).await?;
/// println!("{}", results);
/// # Ok(())
/// # }
/// ```
pub struct FlaxClient<T = HttpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for FlaxClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl FlaxClient<HttpTransport> {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str) -> std::result::Result<Self, TransportError> {
        Ok(Self::with_transport(HttpTransport::new(base_url)?))
    }

    /// Create a client from the `FLAX_URL` environment variable.
    pub fn from_env() -> std::result::Result<Self, TransportError> {
        Ok(Self::with_transport(HttpTransport::from_env()?))
    }
}

impl<T: Transport> FlaxClient<T> {
    /// Create a client over any [`Transport`].
    pub fn with_transport(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Create a client over a transport shared with other code.
    pub fn from_shared(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attach to an existing database.
    ///
    /// Fails with [`FlaxError::Database`] if the service does not confirm the
    /// database exists.
    pub async fn get_database(&self, name: &str) -> Result<Database<T>> {
        let path = format!("dbs/{}", path_segment(name, ErrorKind::Database)?);
        settle(self.transport.get(&path).await, ErrorKind::Database)?;
        Ok(Database::new(Arc::clone(&self.transport), name))
    }

    /// Create a database, failing if one of the same name exists.
    pub async fn create_database(&self, name: &str) -> Result<Database<T>> {
        self.create_database_with_options(name, CreateOptions::default())
            .await
    }

    /// Create a database, optionally replacing or reopening an existing one.
    pub async fn create_database_with_options(
        &self,
        name: &str,
        options: CreateOptions,
    ) -> Result<Database<T>> {
        let path = format!("dbs/{}", path_segment(name, ErrorKind::Database)?);
        settle(
            self.transport.post(&path, &options.to_body()).await,
            ErrorKind::Database,
        )
        .map_err(|e| {
            FlaxError::Database(format!("database could not be created ({})", e.message()))
        })?;
        Ok(Database::new(Arc::clone(&self.transport), name))
    }
}
