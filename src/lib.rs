//! # wisata-etl
//!
//! Batch ETL pipeline for multi-source tourism datasets.
//!
//! Two independent phases share only configuration:
//!
//! 1. **Catalog setup** - verify the raw JSON sources exist, ensure the
//!    metadata database, define and run a crawler to discover table
//!    schemas, and emit a JSON catalog report.
//! 2. **Transform pipeline** - read the cataloged records as one unified
//!    record set, classify each record by field presence, apply per-source
//!    declarative transforms, compute hotel-to-attraction distances within
//!    10 km, aggregate summary statistics, and persist every dataset as
//!    Parquet partitioned by platform.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wisata_etl::catalog::{CrawlerController, LocalCatalog};
//! use wisata_etl::config::PipelineConfig;
//! use wisata_etl::pipeline::TransformPipeline;
//! use wisata_etl::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_file("pipeline.yaml")?;
//!     let catalog = Arc::new(LocalCatalog::for_directory(&config.bucket)?);
//!
//!     // Phase 1: schema discovery
//!     let controller = CrawlerController::new(catalog.clone(), config.clone());
//!     controller.setup(".").await?;
//!
//!     // Phase 2: transform
//!     let pipeline = TransformPipeline::new(catalog, config)?;
//!     let summary = pipeline.run().await?;
//!     println!("{} records processed", summary.record_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Catalog Setup                           │
//! │  verify sources → ensure database → define crawler →         │
//! │  run crawler (poll to READY/STOPPED) → catalog report        │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ discovered tables
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Transform Pipeline                        │
//! │  classify → per-source transforms → distance join →          │
//! │  statistics → partitioned Parquet                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and the dataset model
pub mod types;

/// Pipeline configuration
pub mod config;

/// Catalog and crawler orchestration
pub mod catalog;

/// Schema inference from raw JSON records
pub mod schema;

/// Record classification
pub mod classify;

/// Per-source declarative transformers
pub mod transform;

/// Hotel-to-attraction distance computation
pub mod geo;

/// Summary statistics
pub mod stats;

/// Columnar output (Arrow/Parquet)
pub mod output;

/// Transform pipeline orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
