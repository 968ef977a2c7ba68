//! Declarative field mappings
//!
//! Each transformed dataset is described by a table of [`FieldMapping`]
//! entries: target column name, an ordered list of source paths (dot
//! notation into the raw record, first non-null wins), and a caster. The
//! transform layer walks the table per record; there is no per-source
//! procedural code.
//!
//! Casts are soft. Malformed input degrades to null for that field and the
//! record flows on.

use crate::types::ColumnKind;
use chrono::NaiveDate;
use serde_json::Value;

/// Cast applied to an extracted source value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caster {
    /// Carry text; scalar non-strings are stringified, complex values
    /// degrade to null
    Text,
    /// Cast to 64-bit integer
    Integer,
    /// Cast to 64-bit float
    Double,
    /// Cast to boolean
    Boolean,
    /// Parse a `yyyy-MM-dd` date
    Date,
    /// Rating value: prefer a nested `{"double": ...}` form, fall back to a
    /// direct numeric cast
    Rating,
    /// Array length; null or missing arrays count as zero
    ArrayLen,
    /// Complex value carried as JSON text
    Json,
}

impl Caster {
    /// Column kind produced by this caster
    pub fn column_kind(self) -> ColumnKind {
        match self {
            Caster::Text => ColumnKind::Text,
            Caster::Integer | Caster::ArrayLen => ColumnKind::Integer,
            Caster::Double | Caster::Rating => ColumnKind::Double,
            Caster::Boolean => ColumnKind::Boolean,
            Caster::Date => ColumnKind::Date,
            Caster::Json => ColumnKind::Json,
        }
    }

    /// Apply the cast. Absent input and failed casts both yield null,
    /// except [`Caster::ArrayLen`] which yields zero.
    pub fn apply(self, value: Option<&Value>) -> Value {
        match self {
            Caster::Text => cast_text(value),
            Caster::Integer => cast_integer(value),
            Caster::Double => cast_double(value),
            Caster::Boolean => cast_boolean(value),
            Caster::Date => cast_date(value),
            Caster::Rating => cast_rating(value),
            Caster::ArrayLen => cast_array_len(value),
            Caster::Json => cast_json(value),
        }
    }
}

/// One target column of a transformed dataset
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    /// Target column name
    pub target: &'static str,
    /// Candidate source paths in priority order; the first that resolves to
    /// a non-null value is used
    pub sources: &'static [&'static str],
    /// Cast applied to the extracted value
    pub cast: Caster,
}

impl FieldMapping {
    /// Extract and cast this field from a raw record
    pub fn project(&self, record: &Value) -> Value {
        let source = self
            .sources
            .iter()
            .find_map(|path| extract_path(record, path));
        self.cast.apply(source)
    }
}

/// Resolve a dot-notation path into a record
///
/// Returns `None` for missing segments and for explicit nulls, so callers
/// can coalesce over alternative paths.
pub fn extract_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

// ============================================================================
// Cast implementations
// ============================================================================

fn cast_text(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(Value::Number(n)) => Value::String(n.to_string()),
        Some(Value::Bool(b)) => Value::String(b.to_string()),
        _ => Value::Null,
    }
}

fn cast_integer(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map_or(Value::Null, |i| Value::Number(i.into())),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_or(Value::Null, |i| Value::Number(i.into())),
        _ => Value::Null,
    }
}

fn cast_double(value: Option<&Value>) -> Value {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(serde_json::Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn cast_boolean(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Bool(b)) => Value::Bool(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn cast_date(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())),
        _ => Value::Null,
    }
}

fn cast_rating(value: Option<&Value>) -> Value {
    match value {
        // Nested numeric form wins when present
        Some(Value::Object(map)) => cast_double(map.get("double")),
        other => cast_double(other),
    }
}

fn cast_array_len(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Array(arr)) => Value::Number((arr.len() as i64).into()),
        _ => Value::Number(0.into()),
    }
}

fn cast_json(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(v) => serde_json::to_string(v).map_or(Value::Null, Value::String),
    }
}
