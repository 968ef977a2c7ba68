//! Dataset to Arrow conversion
//!
//! Datasets carry a fixed, declared schema, so Arrow schemas are derived
//! from the column kinds rather than inferred from the data. Values that do
//! not conform to their declared kind become nulls in the resulting arrays.

use crate::error::{Error, Result};
use crate::types::{ColumnKind, ColumnSpec, Dataset, Row};
use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
    TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::sync::Arc;

/// Arrow data type for a column kind
fn arrow_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Text | ColumnKind::Json => DataType::Utf8,
        ColumnKind::Integer => DataType::Int64,
        ColumnKind::Double => DataType::Float64,
        ColumnKind::Boolean => DataType::Boolean,
        ColumnKind::Date => DataType::Date32,
        ColumnKind::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
    }
}

/// Build the Arrow schema for a column list
pub fn arrow_schema(columns: &[ColumnSpec]) -> Schema {
    let fields: Vec<Field> = columns
        .iter()
        .map(|c| Field::new(&c.name, arrow_type(c.kind), true))
        .collect();
    Schema::new(fields)
}

/// Convert dataset rows to an Arrow `RecordBatch`, optionally excluding
/// columns (used to drop the partition column from partitioned files)
pub fn rows_to_arrow(
    columns: &[ColumnSpec],
    rows: &[&Row],
    exclude: &[&str],
) -> Result<RecordBatch> {
    let kept: Vec<&ColumnSpec> = columns
        .iter()
        .filter(|c| !exclude.contains(&c.name.as_str()))
        .collect();

    let schema = Schema::new(
        kept.iter()
            .map(|c| Field::new(&c.name, arrow_type(c.kind), true))
            .collect::<Vec<_>>(),
    );

    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(kept.len());
    for column in &kept {
        let values: Vec<Option<&Value>> = rows.iter().map(|row| row.get(&column.name)).collect();
        arrays.push(build_array(&values, column.kind));
    }

    RecordBatch::try_new(Arc::new(schema), arrays).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Convert a whole dataset to a single `RecordBatch`
pub fn dataset_to_arrow(dataset: &Dataset) -> Result<RecordBatch> {
    let rows: Vec<&Row> = dataset.rows.iter().collect();
    rows_to_arrow(&dataset.columns, &rows, &[])
}

/// Build one Arrow array for a declared column kind
fn build_array(values: &[Option<&Value>], kind: ColumnKind) -> ArrayRef {
    match kind {
        ColumnKind::Text | ColumnKind::Json => {
            let arr: StringArray = values
                .iter()
                .map(|v| v.and_then(Value::as_str).map(ToString::to_string))
                .collect();
            Arc::new(arr)
        }
        ColumnKind::Integer => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Arc::new(arr)
        }
        ColumnKind::Double => {
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Arc::new(arr)
        }
        ColumnKind::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Arc::new(arr)
        }
        ColumnKind::Date => {
            let arr: Date32Array = values
                .iter()
                .map(|v| v.and_then(Value::as_str).and_then(days_since_epoch))
                .collect();
            Arc::new(arr)
        }
        ColumnKind::Timestamp => {
            let arr: TimestampMicrosecondArray = values
                .iter()
                .map(|v| v.and_then(Value::as_str).and_then(micros_since_epoch))
                .collect::<TimestampMicrosecondArray>()
                .with_timezone("UTC");
            Arc::new(arr)
        }
    }
}

/// `yyyy-MM-dd` string to days since the Unix epoch
fn days_since_epoch(s: &str) -> Option<i32> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let days = (date - NaiveDate::default()).num_days();
    i32::try_from(days).ok()
}

/// RFC 3339 string to microseconds since the Unix epoch
fn micros_since_epoch(s: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp_micros())
}
