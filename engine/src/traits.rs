//! Adapter trait definitions with mockall annotations for testing
//!
//! The engine never talks to a broker, database or filesystem directly. Each
//! collaborator sits behind one of these traits and is borrowed by the driver
//! for the duration of an operation; the caller owns its lifecycle.

use serde_json::Value;
use shared::DynamicValues;
use std::path::Path;
use std::time::Duration;

use crate::error::EngineResult;

/// A row returned by a relational store or a document returned by a document store
pub type Record = serde_json::Map<String, Value>;

/// Publish/subscribe message channel
#[mockall::automock]
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
    /// Publish a request body to a destination
    async fn publish(&self, destination: &str, body: &Value) -> EngineResult<()>;

    /// Wait for the next message on a destination
    ///
    /// # Returns
    /// The first message observed, or `EngineError::Timeout` when nothing
    /// arrives within `timeout`
    async fn subscribe(&self, destination: &str, timeout: Duration) -> EngineResult<Value>;

    /// Release the underlying connection
    async fn close(&self) -> EngineResult<()>;
}

/// Relational store queried with fully rendered query text
#[mockall::automock]
#[async_trait::async_trait]
pub trait RelationalStore: Send + Sync {
    async fn query(&self, query: &str) -> EngineResult<Vec<Record>>;

    async fn close(&self) -> EngineResult<()>;
}

/// Document store queried with a rendered filter document
#[mockall::automock]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Value) -> EngineResult<Vec<Record>>;

    async fn close(&self) -> EngineResult<()>;
}

/// Source of descriptor and template text
#[mockall::automock]
#[async_trait::async_trait]
pub trait CaseSource: Send + Sync {
    async fn read_text(&self, path: &Path) -> EngineResult<String>;
}

/// Source of per-run generated values
#[mockall::automock]
pub trait ValueSource: Send + Sync {
    fn generate(&self) -> DynamicValues;
}
