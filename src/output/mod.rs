//! Columnar output
//!
//! # Overview
//!
//! This module provides:
//! - Arrow conversion from declared dataset schemas
//! - Parquet encoding with configurable compression
//! - Local and S3 destinations with Hive-style platform partitioning

mod schema;
mod sink;
mod writer;

pub use schema::{arrow_schema, dataset_to_arrow, rows_to_arrow};
pub use sink::{dataset_dir, partition_dir, OutputSink};
pub use writer::{encode_batch, ParquetWriterConfig};
