//! Catalog setup orchestration
//!
//! Drives the schema-discovery phase against a [`CatalogService`]: verify
//! the raw sources exist, ensure the database, define (or update) the
//! crawler, run it to a terminal state, and emit the discovery report.
//!
//! The service is an explicit capability parameter; nothing here talks to
//! ambient global state.

use super::service::CatalogService;
use super::types::{
    CatalogReport, CrawlerHandle, CrawlerSpec, CrawlerState, SourceCheck, StorageTarget,
    TableSchema,
};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::SourceId;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Fields a well-formed record of each source is expected to carry, used
/// for diagnostics when verifying the raw zone
fn expected_fields(source: SourceId) -> &'static [&'static str] {
    match source {
        SourceId::BookingHotels => &["name", "type", "stars", "location", "facilities", "hotelId"],
        SourceId::BookingReviews => &[
            "rating",
            "reviewTitle",
            "travelerType",
            "hotelRatingScores",
            "hotelId",
        ],
        SourceId::TripadvisorHotels => &[
            "name",
            "category",
            "rating",
            "latitude",
            "longitude",
            "amenities",
        ],
        SourceId::TripadvisorReviews => &["rating", "text", "title", "locationId", "publishedDate"],
        SourceId::GeospatialAttractions => {
            &["title", "categoryName", "location", "totalScore", "reviewsCount"]
        }
    }
}

/// Orchestrates the catalog setup phase
pub struct CrawlerController {
    service: Arc<dyn CatalogService>,
    config: PipelineConfig,
}

impl CrawlerController {
    /// Create a controller over a catalog service
    pub fn new(service: Arc<dyn CatalogService>, config: PipelineConfig) -> Self {
        Self { service, config }
    }

    /// Check that every configured raw source exists
    ///
    /// Missing sources are reported, not fatal; the crawler simply finds
    /// fewer tables.
    pub async fn verify_sources(&self) -> Result<BTreeMap<SourceId, SourceCheck>> {
        info!("Verifying raw source files...");
        let mut checks = BTreeMap::new();

        for source in SourceId::ALL {
            let location = self.config.source_path(source)?;
            let check = match self.service.head_object(location).await? {
                Some(size) => {
                    info!("  {source}: found {location} ({size} bytes)");
                    info!("    expected fields: {}", expected_fields(source).join(", "));
                    SourceCheck {
                        found: true,
                        size: Some(size),
                    }
                }
                None => {
                    warn!("  {source}: no file at {location}");
                    SourceCheck {
                        found: false,
                        size: None,
                    }
                }
            };
            checks.insert(source, check);
        }

        Ok(checks)
    }

    /// Ensure the catalog database exists
    pub async fn ensure_database(&self) -> Result<()> {
        self.service.ensure_database(&self.config.database).await
    }

    /// Define the crawler, one deduplicated storage target per source
    /// directory. Re-defining an existing crawler updates it in place.
    pub async fn define_crawler(&self) -> Result<CrawlerHandle> {
        let mut targets: Vec<StorageTarget> = Vec::new();
        for source in SourceId::ALL {
            let path = self.config.source_path(source)?;
            let dir = parent_dir(path);
            if targets.iter().all(|t| t.path != dir) {
                targets.push(StorageTarget::new(dir));
            }
        }

        let spec = CrawlerSpec {
            name: self.config.crawler.name.clone(),
            database: self.config.database.clone(),
            table_prefix: self.config.crawler.table_prefix.clone(),
            targets,
        };
        self.service.put_crawler(spec).await
    }

    /// Run the crawler and block until it reaches a terminal state
    ///
    /// Polls on the configured interval. There is deliberately no deadline:
    /// a crawler that never leaves RUNNING blocks the caller indefinitely,
    /// matching the managed service's semantics.
    pub async fn run_crawler(&self, handle: &CrawlerHandle) -> Result<CrawlerState> {
        self.service.start_crawler(handle).await?;
        info!("Started crawler: {}", handle.name);

        let interval = Duration::from_secs(self.config.crawler.poll_interval_seconds);
        loop {
            let status = self.service.crawler_state(handle).await?;
            info!("Crawler state: {}", status.state);

            match status.state {
                CrawlerState::Ready => {
                    if let Some(last) = status.last_crawl {
                        info!("Crawler completed successfully");
                        info!("  Tables created: {}", last.tables_created);
                        info!("  Tables updated: {}", last.tables_updated);
                        info!("  Tables deleted: {}", last.tables_deleted);
                    }
                    return Ok(CrawlerState::Ready);
                }
                CrawlerState::Stopping | CrawlerState::Stopped => {
                    warn!("Crawler stopped before completing");
                    return Ok(status.state);
                }
                CrawlerState::Running => {}
            }

            tokio::time::sleep(interval).await;
        }
    }

    /// Tables discovered in the configured database
    pub async fn discovered_tables(&self) -> Result<Vec<TableSchema>> {
        let tables = self.service.list_tables(&self.config.database).await?;
        info!(
            "Discovered {} tables in database '{}'",
            tables.len(),
            self.config.database
        );
        for table in &tables {
            info!(
                "  {}: {} columns at {}",
                table.name,
                table.columns.len(),
                table.location
            );
        }
        Ok(tables)
    }

    /// Build the discovery report
    pub async fn catalog_report(&self) -> Result<CatalogReport> {
        let tables = self.discovered_tables().await?;
        Ok(CatalogReport {
            database_name: self.config.database.clone(),
            total_tables: tables.len(),
            discovery_timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tables,
        })
    }

    /// Build the discovery report and save it as a timestamped JSON file
    ///
    /// Returns the report and the path written.
    pub async fn save_catalog_report(&self, dir: impl AsRef<Path>) -> Result<(CatalogReport, std::path::PathBuf)> {
        let report = self.catalog_report().await?;
        let filename = format!(
            "{}_catalog_report_{}.json",
            self.config.database,
            Utc::now().timestamp()
        );
        let path = dir.as_ref().join(filename);
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!("Data catalog report saved to {}", path.display());
        Ok((report, path))
    }

    /// Run the complete setup phase: verify, ensure database, define and
    /// run the crawler, emit the report
    pub async fn setup(&self, report_dir: impl AsRef<Path>) -> Result<CatalogReport> {
        info!("Starting schema discovery setup");

        self.verify_sources().await?;
        self.ensure_database().await?;
        let handle = self.define_crawler().await?;
        self.run_crawler(&handle).await?;
        let (report, _) = self.save_catalog_report(report_dir).await?;

        info!(
            "Schema discovery completed: {} tables in '{}'",
            report.total_tables, report.database_name
        );
        Ok(report)
    }
}

/// Directory portion of a source path
fn parent_dir(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}
