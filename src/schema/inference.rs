//! Field type inference and merging

use serde_json::Value;
use std::collections::BTreeMap;

/// Inferred storage type of a JSON field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 text (also the fallback for conflicting types)
    String,
    /// 64-bit integer
    Bigint,
    /// 64-bit float
    Double,
    /// Boolean
    Boolean,
    /// Homogeneous array
    Array(Box<FieldType>),
    /// Nested object
    Struct(BTreeMap<String, FieldType>),
    /// Only nulls seen so far
    Null,
}

impl FieldType {
    /// Merge two types into the most specific common type
    ///
    /// Null merges with anything, integers promote to doubles, and
    /// otherwise-incompatible types fall back to string.
    pub fn merge(&self, other: &FieldType) -> FieldType {
        match (self, other) {
            (a, b) if a == b => a.clone(),
            (FieldType::Null, t) | (t, FieldType::Null) => t.clone(),
            (FieldType::Bigint, FieldType::Double) | (FieldType::Double, FieldType::Bigint) => {
                FieldType::Double
            }
            (FieldType::Array(a), FieldType::Array(b)) => {
                FieldType::Array(Box::new(a.merge(b)))
            }
            (FieldType::Struct(a), FieldType::Struct(b)) => {
                let mut merged = a.clone();
                for (key, b_type) in b {
                    merged
                        .entry(key.clone())
                        .and_modify(|a_type| *a_type = a_type.merge(b_type))
                        .or_insert_with(|| b_type.clone());
                }
                FieldType::Struct(merged)
            }
            _ => FieldType::String,
        }
    }

    /// Render Hive-style
    pub fn render(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Bigint => "bigint".to_string(),
            FieldType::Double => "double".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Array(item) => format!("array<{}>", item.render()),
            FieldType::Struct(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(name, ty)| format!("{name}:{}", ty.render()))
                    .collect();
                format!("struct<{}>", inner.join(","))
            }
            // Never-populated fields surface as string columns
            FieldType::Null => "string".to_string(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Schema inferrer with a nesting depth guard
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    max_depth: usize,
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInferrer {
    /// Create an inferrer with the default depth limit
    pub fn new() -> Self {
        Self { max_depth: 10 }
    }

    /// Set the maximum nesting depth; deeper values collapse to string
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Infer column types over a batch of records
    ///
    /// Non-object records are skipped. Columns come back sorted by name.
    pub fn infer(&self, records: &[Value]) -> Vec<(String, FieldType)> {
        let mut fields: BTreeMap<String, FieldType> = BTreeMap::new();

        for record in records {
            let Value::Object(map) = record else {
                continue;
            };
            for (key, value) in map {
                let inferred = self.field_type(value, 0);
                fields
                    .entry(key.clone())
                    .and_modify(|existing| *existing = existing.merge(&inferred))
                    .or_insert(inferred);
            }
        }

        fields.into_iter().collect()
    }

    fn field_type(&self, value: &Value, depth: usize) -> FieldType {
        if depth >= self.max_depth {
            return FieldType::String;
        }
        match value {
            Value::Null => FieldType::Null,
            Value::Bool(_) => FieldType::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    FieldType::Bigint
                } else {
                    FieldType::Double
                }
            }
            Value::String(_) => FieldType::String,
            Value::Array(arr) => {
                let item = arr
                    .iter()
                    .map(|v| self.field_type(v, depth + 1))
                    .reduce(|a, b| a.merge(&b))
                    .unwrap_or(FieldType::String);
                FieldType::Array(Box::new(item))
            }
            Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.field_type(v, depth + 1)))
                    .collect();
                FieldType::Struct(fields)
            }
        }
    }
}

/// Infer column types with default settings (convenience function)
pub fn infer_columns(records: &[Value]) -> Vec<(String, FieldType)> {
    SchemaInferrer::new().infer(records)
}
