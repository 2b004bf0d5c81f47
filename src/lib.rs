//! # flax-client
//!
//! A Rust client for the Flax search service REST API.
//!
//! Provides:
//! - **Library**: async client for databases, schema fields, documents, and
//!   simple or structured search
//! - **CLI**: `flax` binary for terminal use (feature `cli`)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use flax_client::{FlaxClient, StructuredQuery};
//! use serde_json::json;
//!
//! // Connect to FLAX_URL (default http://localhost:8080/)
//! let client = FlaxClient::from_env()?;
//! let db = client.create_database("library").await?;
//!
//! db.add_field("title", &json!({"type": "text", "store": true})).await?;
//! db.add_document(&json!({"title": "The Left Hand of Darkness"}), Some("lhod")).await?;
//! db.commit().await?;
//!
//! let hits = db
//!     .search_structured(&StructuredQuery::new().all("darkness").filter("lang", "en"))
//!     .await?;
//! println!("{}", hits);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Failures are one of three [`FlaxError`] categories chosen by the resource
//! the call concerned: `Database`, `Field` (schema and commit) or `Document`
//! (documents and search). Each carries the service's diagnostic verbatim.

pub mod client;
pub mod database;
pub mod documents;
pub mod encode;
pub mod error;
pub mod query;
pub mod schema;
pub mod search;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export key types at the crate root.
pub use client::FlaxClient;
pub use database::Database;
pub use error::{ErrorKind, FlaxError, TransportError};
pub use query::{SimpleQuery, StructuredQuery};
pub use transport::{HttpTransport, Reply, Transport};
pub use types::*;
