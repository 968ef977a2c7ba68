//! The catalog service boundary
//!
//! Everything the pipeline needs from the managed catalog/crawler service,
//! as one async trait. The orchestration layer takes the service as an
//! explicit capability parameter, so the transform logic stays testable
//! against the in-process `LocalCatalog` implementation.

use super::types::{CrawlerHandle, CrawlerSpec, CrawlerStatus, TableSchema};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Managed catalog and crawler operations
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Size of the object at `location`, or `None` when it does not exist
    async fn head_object(&self, location: &str) -> Result<Option<u64>>;

    /// Create the database if missing; an existing database is success
    async fn ensure_database(&self, name: &str) -> Result<()>;

    /// Create or update a crawler definition in place
    async fn put_crawler(&self, spec: CrawlerSpec) -> Result<CrawlerHandle>;

    /// Start a crawl run
    async fn start_crawler(&self, handle: &CrawlerHandle) -> Result<()>;

    /// Current crawler state and last-crawl summary
    async fn crawler_state(&self, handle: &CrawlerHandle) -> Result<CrawlerStatus>;

    /// Tables registered in a database
    async fn list_tables(&self, database: &str) -> Result<Vec<TableSchema>>;

    /// Read the raw records behind a registered table
    async fn read_records(&self, database: &str, table: &str) -> Result<Vec<Value>>;
}
