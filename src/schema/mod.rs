//! Schema inference from raw JSON records
//!
//! Used by the local crawler to derive catalog column types from sampled
//! records. Types are rendered Hive-style (`string`, `bigint`, `double`,
//! `array<...>`, `struct<...>`) so the discovered tables read like any
//! other catalog entry.

mod inference;

pub use inference::{infer_columns, FieldType, SchemaInferrer};
