//! Common types shared across the pipeline
//!
//! The central type is [`Dataset`]: a fixed-schema, in-memory collection of
//! rows produced by the transform layer and consumed by the statistics and
//! output layers. Rows are JSON objects whose values are constrained to the
//! column kinds declared in the dataset schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single output row: target column name to (already cast) value
pub type Row = serde_json::Map<String, Value>;

// ============================================================================
// Source identification
// ============================================================================

/// The five configured raw data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    BookingHotels,
    BookingReviews,
    TripadvisorHotels,
    TripadvisorReviews,
    GeospatialAttractions,
}

impl SourceId {
    /// All sources, in pipeline order
    pub const ALL: [SourceId; 5] = [
        SourceId::BookingHotels,
        SourceId::BookingReviews,
        SourceId::TripadvisorHotels,
        SourceId::TripadvisorReviews,
        SourceId::GeospatialAttractions,
    ];

    /// Stable key used in configuration and dataset names
    pub fn key(self) -> &'static str {
        match self {
            SourceId::BookingHotels => "booking_hotels",
            SourceId::BookingReviews => "booking_reviews",
            SourceId::TripadvisorHotels => "tripadvisor_hotels",
            SourceId::TripadvisorReviews => "tripadvisor_reviews",
            SourceId::GeospatialAttractions => "geospatial_attractions",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Classification tag assigned to every ingested record
///
/// `Unknown` records are excluded from all downstream transforms; the
/// classifier reports how many fell through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceType {
    BookingHotel,
    BookingReview,
    TripadvisorHotel,
    TripadvisorReview,
    GeospatialAttraction,
    Unknown,
}

impl DataSourceType {
    /// Tag name as it appears in logs and reports
    pub fn as_str(self) -> &'static str {
        match self {
            DataSourceType::BookingHotel => "booking_hotel",
            DataSourceType::BookingReview => "booking_review",
            DataSourceType::TripadvisorHotel => "tripadvisor_hotel",
            DataSourceType::TripadvisorReview => "tripadvisor_review",
            DataSourceType::GeospatialAttraction => "geospatial_attraction",
            DataSourceType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw record annotated with its ingestion row id and classification
#[derive(Debug, Clone)]
pub struct ClassifiedRecord {
    /// Monotonically increasing id, unique within one ingestion run
    pub row_id: i64,
    /// First-match classification tag
    pub source_type: DataSourceType,
    /// The untouched raw record
    pub record: Value,
}

// ============================================================================
// Datasets
// ============================================================================

/// Value domain of a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// UTF-8 text
    Text,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Double,
    /// Boolean
    Boolean,
    /// Calendar date, carried as a `yyyy-MM-dd` string
    Date,
    /// UTC timestamp, carried as an RFC 3339 string
    Timestamp,
    /// Complex value serialized to JSON text
    Json,
}

/// A single column in a dataset schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Value domain
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// Create a new column spec
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A fixed-schema, in-memory collection of transformed rows
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset name (also the output directory name)
    pub name: String,
    /// Ordered column schema
    pub columns: Vec<ColumnSpec>,
    /// Rows; every value conforms to its column kind or is null
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Create an empty dataset with the given schema
    pub fn empty(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the schema contains the named column
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Iterate the non-null `f64` values of a column
    pub fn doubles(&self, name: &str) -> impl Iterator<Item = f64> + '_ {
        let name = name.to_string();
        self.rows
            .iter()
            .filter_map(move |row| row.get(&name).and_then(Value::as_f64))
    }
}
