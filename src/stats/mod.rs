//! Summary statistics over transformed datasets
//!
//! Pure aggregation: per-dataset record and column counts, plus rating
//! aggregates when the dataset schema carries a `rating` column. A rating
//! block that cannot be computed (no non-null values) is skipped with a
//! warning, never a failure.

use crate::types::Dataset;
use serde::Serialize;
use tracing::{info, warn};


/// Rating aggregates for one dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub avg_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
}

/// Summary for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    /// Dataset name
    pub dataset: String,
    /// Number of rows
    pub record_count: usize,
    /// Number of schema columns
    pub column_count: usize,
    /// Rating aggregates, present only when the schema has a `rating`
    /// column and at least one non-null value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingStats>,
}

/// Compute rating aggregates over the non-null values of the `rating`
/// column, or `None` when there is nothing to aggregate
fn rating_stats(dataset: &Dataset) -> Option<RatingStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for value in dataset.doubles("rating") {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return None;
    }
    Some(RatingStats {
        avg_rating: sum / count as f64,
        min_rating: min,
        max_rating: max,
    })
}

/// Summarize one dataset
pub fn summarize(dataset: &Dataset) -> DatasetStats {
    let rating = if dataset.has_column("rating") {
        let stats = rating_stats(dataset);
        if stats.is_none() {
            warn!(
                "Could not calculate rating stats for {}: no non-null ratings",
                dataset.name
            );
        }
        stats
    } else {
        None
    };

    DatasetStats {
        dataset: dataset.name.clone(),
        record_count: dataset.len(),
        column_count: dataset.column_count(),
        rating,
    }
}

/// Summarize all datasets and log the result
pub fn summarize_all(datasets: &[&Dataset]) -> Vec<DatasetStats> {
    let stats: Vec<DatasetStats> = datasets.iter().map(|d| summarize(d)).collect();

    info!("Summary statistics:");
    for entry in &stats {
        info!(
            "  {}: {} records, {} columns",
            entry.dataset, entry.record_count, entry.column_count
        );
        if let Some(rating) = &entry.rating {
            info!(
                "    rating avg/min/max: {:.2}/{:.1}/{:.1}",
                rating.avg_rating, rating.min_rating, rating.max_rating
            );
        }
    }

    stats
}
