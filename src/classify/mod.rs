//! Record classification
//!
//! Classifies raw records into source types by field presence. The rules
//! form a strict first-match decision list: they are evaluated in order and
//! the first rule whose field conditions hold decides the tag. Records that
//! match no rule are tagged [`DataSourceType::Unknown`] and excluded from
//! every downstream transform; the distribution (including the unknown
//! count) is reported so the fallthrough is visible.
//!
//! Classification never fails: a missing or null field is a signal, not an
//! error.

use crate::types::{ClassifiedRecord, DataSourceType};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;


/// One entry of the decision list
struct Rule {
    tag: DataSourceType,
    /// Fields that must be present and non-null
    present: &'static [&'static str],
    /// Fields that must be absent or null
    absent: &'static [&'static str],
}

/// The decision list, in evaluation order. Order matters: booking reviews
/// also carry `hotelId`, tripadvisor reviews also carry `locationId`, so
/// the hotel rules disambiguate with an absence condition.
const RULES: &[Rule] = &[
    Rule {
        tag: DataSourceType::BookingHotel,
        present: &["hotelId", "facilities", "type"],
        absent: &["reviewTitle"],
    },
    Rule {
        tag: DataSourceType::BookingReview,
        present: &["hotelId", "hotelRatingScores", "reviewTitle"],
        absent: &[],
    },
    Rule {
        tag: DataSourceType::TripadvisorHotel,
        present: &["locationId", "amenities", "latitude"],
        absent: &["text"],
    },
    Rule {
        tag: DataSourceType::TripadvisorReview,
        present: &["locationId", "text", "publishedDate"],
        absent: &[],
    },
    Rule {
        tag: DataSourceType::GeospatialAttraction,
        present: &["categoryName", "additionalInfo", "placeId"],
        absent: &[],
    },
];

/// Whether a field is present with a non-null value
fn has(record: &Value, field: &str) -> bool {
    matches!(record.get(field), Some(v) if !v.is_null())
}

/// Classify a single record
///
/// Returns exactly one tag; [`DataSourceType::Unknown`] when no rule
/// matches.
pub fn classify(record: &Value) -> DataSourceType {
    for rule in RULES {
        let matches = rule.present.iter().all(|f| has(record, f))
            && rule.absent.iter().all(|f| !has(record, f));
        if matches {
            return rule.tag;
        }
    }
    DataSourceType::Unknown
}

/// A classified batch of records with its type distribution
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBatch {
    /// All records, classified, in ingestion order
    pub records: Vec<ClassifiedRecord>,
    /// Record count per classification tag
    pub distribution: BTreeMap<DataSourceType, usize>,
}

impl ClassifiedBatch {
    /// Records carrying the given tag
    pub fn of_type(&self, tag: DataSourceType) -> impl Iterator<Item = &ClassifiedRecord> {
        self.records.iter().filter(move |r| r.source_type == tag)
    }

    /// Count of records for the given tag
    pub fn count(&self, tag: DataSourceType) -> usize {
        self.distribution.get(&tag).copied().unwrap_or(0)
    }

    /// Count of records that matched no rule
    pub fn unknown_count(&self) -> usize {
        self.count(DataSourceType::Unknown)
    }
}

/// Ingest a batch of raw records: assign row ids and classify
///
/// Row ids are monotonically increasing and unique within this ingestion
/// run; they are not stable across re-runs.
pub fn ingest(records: Vec<Value>) -> ClassifiedBatch {
    let mut batch = ClassifiedBatch::default();

    for (i, record) in records.into_iter().enumerate() {
        let source_type = classify(&record);
        *batch.distribution.entry(source_type).or_insert(0) += 1;
        batch.records.push(ClassifiedRecord {
            row_id: i as i64,
            source_type,
            record,
        });
    }

    info!("Data source distribution:");
    for (tag, count) in &batch.distribution {
        info!("  {tag}: {count} records");
    }

    batch
}
