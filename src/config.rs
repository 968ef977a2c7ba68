//! Pipeline configuration
//!
//! A single YAML document configures both phases: the storage bucket and
//! per-source raw paths, the catalog database and crawler settings, and the
//! output destination for transformed datasets.

use crate::error::{Error, Result};
use crate::types::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Storage bucket (or local root) holding the raw zone
    pub bucket: String,

    /// Catalog database name
    pub database: String,

    /// Crawler settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Raw file location per source, relative to the bucket root
    pub source_paths: BTreeMap<SourceId, String>,

    /// Output settings for transformed datasets
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Crawler name
    #[serde(default = "default_crawler_name")]
    pub name: String,

    /// Prefix prepended to discovered table names
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Seconds between crawler state polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            name: default_crawler_name(),
            table_prefix: default_table_prefix(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_crawler_name() -> String {
    "tourism-crawler".to_string()
}

fn default_table_prefix() -> String {
    "tourism_".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination root: a local directory or an `s3://bucket/prefix` URL
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Stage directory under the destination root
    #[serde(default = "default_stage")]
    pub stage: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            stage: default_stage(),
        }
    }
}

fn default_destination() -> String {
    "./output".to_string()
}

fn default_stage() -> String {
    "processed".to_string()
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::missing_field("bucket"));
        }
        if self.database.is_empty() {
            return Err(Error::missing_field("database"));
        }
        for source in SourceId::ALL {
            match self.source_paths.get(&source) {
                None => {
                    return Err(Error::missing_field(format!("source_paths.{source}")));
                }
                Some(path) if path.is_empty() => {
                    return Err(Error::config(format!("empty path for source '{source}'")));
                }
                Some(_) => {}
            }
        }
        if self.crawler.poll_interval_seconds == 0 {
            return Err(Error::config("crawler.poll_interval_seconds must be > 0"));
        }
        Ok(())
    }

    /// Raw path for one source, relative to the bucket root
    ///
    /// Only valid after [`validate`](Self::validate); missing entries are a
    /// config error, not a runtime surprise.
    pub fn source_path(&self, source: SourceId) -> Result<&str> {
        self.source_paths
            .get(&source)
            .map(String::as_str)
            .ok_or_else(|| Error::missing_field(format!("source_paths.{source}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
bucket: rdv-apify-storage
database: yogyakarta_tourism_db
source_paths:
  booking_hotels: "raw-json/booking-full-hotel.json"
  booking_reviews: "raw-json/booking-full-review.json"
  tripadvisor_hotels: "raw-json/tripadvisor-full-hotel.json"
  tripadvisor_reviews: "raw-json/tripadvisor-full-review.json"
  geospatial_attractions: "raw-json/geospatial-attractions.json"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = PipelineConfig::from_str(MINIMAL).unwrap();
        assert_eq!(config.bucket, "rdv-apify-storage");
        assert_eq!(config.database, "yogyakarta_tourism_db");
        assert_eq!(config.crawler.name, "tourism-crawler");
        assert_eq!(config.crawler.poll_interval_seconds, 30);
        assert_eq!(config.output.stage, "processed");
    }

    #[test]
    fn test_source_path_lookup() {
        let config = PipelineConfig::from_str(MINIMAL).unwrap();
        assert_eq!(
            config.source_path(SourceId::BookingHotels).unwrap(),
            "raw-json/booking-full-hotel.json"
        );
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let yaml = r#"
bucket: b
database: d
source_paths:
  booking_hotels: "raw-json/a.json"
"#;
        let err = PipelineConfig::from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("source_paths.booking_reviews"));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let yaml = format!("{MINIMAL}\ncrawler:\n  poll_interval_seconds: 0\n");
        assert!(PipelineConfig::from_str(&yaml).is_err());
    }

    #[test]
    fn test_crawler_overrides() {
        let yaml = format!(
            "{MINIMAL}\ncrawler:\n  name: yogya-crawler\n  table_prefix: yogya_tourism_\n"
        );
        let config = PipelineConfig::from_str(&yaml).unwrap();
        assert_eq!(config.crawler.name, "yogya-crawler");
        assert_eq!(config.crawler.table_prefix, "yogya_tourism_");
        // Unset fields keep defaults
        assert_eq!(config.crawler.poll_interval_seconds, 30);
    }
}
