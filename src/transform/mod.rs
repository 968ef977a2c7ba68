//! Per-source transformers
//!
//! Stateless mapping from classified raw records to fixed-schema datasets.
//! The per-source logic lives entirely in the declarative [`SourceTable`]
//! definitions; this module walks a table over the matching subset of a
//! classified batch and stamps the lineage and metadata columns
//! (`source_row_id`, `platform`, `processed_at`) on every row.
//!
//! An empty matching subset yields an empty dataset, never an error.

mod mapping;
mod sources;

pub use mapping::{extract_path, Caster, FieldMapping};
pub use sources::{
    SourceTable, ALL_TABLES, BOOKING_HOTELS, BOOKING_REVIEWS, GEOSPATIAL_ATTRACTIONS,
    TRIPADVISOR_HOTELS, TRIPADVISOR_REVIEWS,
};

use crate::classify::ClassifiedBatch;
use crate::types::{ColumnKind, ColumnSpec, Dataset, Row};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::info;

#[cfg(test)]
mod tests;

/// Output schema for a source table: lineage id first, mapped columns in
/// table order, metadata columns last
pub fn output_columns(table: &SourceTable) -> Vec<ColumnSpec> {
    let mut columns = Vec::with_capacity(table.fields.len() + 3);
    columns.push(ColumnSpec::new("source_row_id", ColumnKind::Integer));
    for field in table.fields {
        columns.push(ColumnSpec::new(field.target, field.cast.column_kind()));
    }
    columns.push(ColumnSpec::new("platform", ColumnKind::Text));
    columns.push(ColumnSpec::new("processed_at", ColumnKind::Timestamp));
    columns
}

/// Transform the records matching one source table into a dataset
///
/// `processed_at` is stamped from `now` for the whole batch, so re-running
/// the transform on identical input differs only in that column.
pub fn apply(table: &SourceTable, batch: &ClassifiedBatch, now: DateTime<Utc>) -> Dataset {
    let mut dataset = Dataset::empty(table.dataset, output_columns(table));
    let processed_at = now.to_rfc3339_opts(SecondsFormat::Micros, true);

    for classified in batch.of_type(table.source_type) {
        let mut row = Row::new();
        row.insert(
            "source_row_id".to_string(),
            Value::Number(classified.row_id.into()),
        );
        for field in table.fields {
            row.insert(field.target.to_string(), field.project(&classified.record));
        }
        row.insert(
            "platform".to_string(),
            Value::String(table.platform.to_string()),
        );
        row.insert(
            "processed_at".to_string(),
            Value::String(processed_at.clone()),
        );
        dataset.rows.push(row);
    }

    if dataset.is_empty() {
        info!("No {} data found", table.dataset);
    } else {
        info!("Transformed {} {} records", dataset.len(), table.dataset);
    }

    dataset
}

/// Run all five transformers over a classified batch
pub fn apply_all(batch: &ClassifiedBatch, now: DateTime<Utc>) -> Vec<Dataset> {
    ALL_TABLES
        .iter()
        .map(|table| apply(table, batch, now))
        .collect()
}
