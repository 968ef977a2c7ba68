//! Transform pipeline orchestration
//!
//! Phase two of the system: read the cataloged records as one unified
//! record set, classify, run the per-source transformers, join hotels to
//! attractions by distance, summarize, and persist every dataset as
//! partitioned Parquet.
//!
//! The steps are sequential and the per-record transforms are pure; the
//! catalog service and the output sink are the only effectful edges.

use crate::catalog::CatalogService;
use crate::classify;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::geo;
use crate::output::{OutputSink, ParquetWriterConfig};
use crate::stats::{self, DatasetStats};
use crate::transform;
use crate::types::{DataSourceType, Dataset};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};


/// Output of the pure transform stage
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The five per-source datasets, plus the distance dataset when both
    /// sides of the join had located records
    pub datasets: Vec<Dataset>,
    /// Records per classification tag (includes `unknown`)
    pub distribution: BTreeMap<DataSourceType, usize>,
    /// Total records ingested
    pub record_count: usize,
}

impl TransformOutcome {
    /// Records that matched no classification rule and were dropped
    pub fn unknown_records(&self) -> usize {
        self.distribution
            .get(&DataSourceType::Unknown)
            .copied()
            .unwrap_or(0)
    }
}

/// Pure transform stage: classify and produce every output dataset
pub fn transform_records(records: Vec<Value>) -> TransformOutcome {
    let record_count = records.len();
    let batch = classify::ingest(records);
    if batch.unknown_count() > 0 {
        info!(
            "{} records did not match any known source and will be dropped",
            batch.unknown_count()
        );
    }

    let mut datasets = transform::apply_all(&batch, Utc::now());

    let hotels: Vec<&Dataset> = datasets
        .iter()
        .filter(|d| d.name == "booking_hotels" || d.name == "tripadvisor_hotels")
        .collect();
    let attractions = datasets.iter().find(|d| d.name == "geospatial_attractions");

    let distances = match attractions {
        Some(attractions) => geo::nearby_pairs(&hotels, attractions),
        None => None,
    };

    let distribution = batch.distribution;
    if let Some(distances) = distances {
        datasets.push(distances);
    }

    TransformOutcome {
        datasets,
        distribution,
        record_count,
    }
}

/// Result summary of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Total records ingested
    pub record_count: usize,
    /// Records per classification tag (includes `unknown`)
    pub distribution: BTreeMap<DataSourceType, usize>,
    /// Records that matched no classification rule and were dropped
    pub unknown_records: usize,
    /// Per-dataset statistics
    pub dataset_stats: Vec<DatasetStats>,
    /// Names of the datasets persisted (empty datasets are skipped)
    pub datasets_written: Vec<String>,
}

/// Orchestrates the transform phase against a catalog service and a sink
pub struct TransformPipeline {
    service: Arc<dyn CatalogService>,
    sink: OutputSink,
    config: PipelineConfig,
    writer_config: ParquetWriterConfig,
}

impl TransformPipeline {
    /// Create a pipeline; the sink is built from the output config
    pub fn new(service: Arc<dyn CatalogService>, config: PipelineConfig) -> Result<Self> {
        let sink = OutputSink::parse(&config.output.destination)?;
        Ok(Self {
            service,
            sink,
            config,
            writer_config: ParquetWriterConfig::default(),
        })
    }

    /// Override the Parquet writer settings
    #[must_use]
    pub fn with_writer_config(mut self, writer_config: ParquetWriterConfig) -> Self {
        self.writer_config = writer_config;
        self
    }

    /// Read every cataloged table into one unified record set
    pub async fn read_source_records(&self) -> Result<Vec<Value>> {
        info!("Reading source data from the catalog...");
        let tables = self.service.list_tables(&self.config.database).await?;

        let mut records = Vec::new();
        for table in &tables {
            let mut table_records = self
                .service
                .read_records(&self.config.database, &table.name)
                .await?;
            info!("  {}: {} records", table.name, table_records.len());
            records.append(&mut table_records);
        }

        info!("Source data loaded. Total records: {}", records.len());
        Ok(records)
    }

    /// Persist all non-empty datasets; returns the dataset names written
    async fn save_datasets(&self, datasets: &[Dataset]) -> Result<Vec<String>> {
        let mut written = Vec::new();
        for dataset in datasets {
            if dataset.is_empty() {
                info!("Skipping {}: 0 records", dataset.name);
                continue;
            }
            info!(
                "Saving {} to {}/{}",
                dataset.name, self.config.output.stage, dataset.name
            );
            self.sink
                .write_dataset(&self.config.output.stage, dataset, &self.writer_config)
                .await?;
            written.push(dataset.name.clone());
        }
        Ok(written)
    }

    /// Run the complete transform pipeline
    pub async fn run(&self) -> Result<PipelineSummary> {
        info!("Starting tourism ETL pipeline");

        let records = self.read_source_records().await?;
        let outcome = transform_records(records);

        let dataset_refs: Vec<&Dataset> = outcome.datasets.iter().collect();
        let dataset_stats = stats::summarize_all(&dataset_refs);

        let datasets_written = self.save_datasets(&outcome.datasets).await?;

        info!("ETL pipeline completed successfully");
        Ok(PipelineSummary {
            record_count: outcome.record_count,
            unknown_records: outcome.unknown_records(),
            distribution: outcome.distribution,
            dataset_stats,
            datasets_written,
        })
    }

    /// Run the pipeline, logging any failure; returns whether it succeeded
    ///
    /// The failure path logs the full error chain; there are no
    /// partial-success or rollback semantics.
    pub async fn run_logged(&self) -> bool {
        match self.run().await {
            Ok(summary) => {
                info!(
                    "Processed {} records into {} datasets",
                    summary.record_count,
                    summary.datasets_written.len()
                );
                true
            }
            Err(e) => {
                error!("Error in ETL pipeline: {e}");
                error!("{e:?}");
                false
            }
        }
    }
}
