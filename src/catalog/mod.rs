//! Catalog and crawler orchestration
//!
//! # Overview
//!
//! This module provides:
//! - `CatalogService` - the boundary trait for the managed catalog service
//! - `LocalCatalog` - an in-process implementation over `object_store`
//! - `CrawlerController` - the setup-phase orchestration and report

mod controller;
mod local;
mod service;
mod types;

pub use controller::CrawlerController;
pub use local::LocalCatalog;
pub use service::CatalogService;
pub use types::{
    CatalogReport, ColumnDef, CrawlerHandle, CrawlerSpec, CrawlerState, CrawlerStatus, LastCrawl,
    SourceCheck, StorageTarget, TableSchema,
};

#[cfg(test)]
mod tests;
