//! Catalog types
//!
//! Shapes exchanged with the catalog/crawler service and emitted in the
//! discovery report.

use serde::{Deserialize, Serialize};

/// A column of a discovered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Hive-style type string
    #[serde(rename = "type")]
    pub col_type: String,
    /// Optional column comment
    #[serde(default)]
    pub comment: String,
}

impl ColumnDef {
    /// Create a column definition with an empty comment
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            comment: String::new(),
        }
    }
}

/// A table registered in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name (crawler prefix + sanitized file stem)
    pub name: String,
    /// Storage location the table was discovered at
    pub location: String,
    /// Input format identifier
    pub input_format: String,
    /// Output format identifier
    pub output_format: String,
    /// Discovered columns
    pub columns: Vec<ColumnDef>,
    /// Record count, when known
    #[serde(default)]
    pub row_count: Option<u64>,
    /// Source file size in bytes, when known
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// One storage target of a crawler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTarget {
    /// Directory prefix to scan
    pub path: String,
    /// Filename patterns to skip (`*.tmp` style suffix globs)
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl StorageTarget {
    /// Create a target with the default exclusion patterns
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exclusions: vec!["*.tmp".to_string(), "*.log".to_string()],
        }
    }

    /// Whether a filename is excluded from the scan
    pub fn excludes(&self, filename: &str) -> bool {
        self.exclusions.iter().any(|pattern| {
            match pattern.strip_prefix('*') {
                Some(suffix) => filename.ends_with(suffix),
                None => filename == pattern,
            }
        })
    }
}

/// Crawler definition; `put_crawler` with an existing name updates in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerSpec {
    /// Crawler name
    pub name: String,
    /// Database discovered tables are registered in
    pub database: String,
    /// Prefix prepended to table names
    pub table_prefix: String,
    /// Storage targets to scan
    pub targets: Vec<StorageTarget>,
}

/// Opaque handle to a defined crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerHandle {
    /// Crawler name
    pub name: String,
}

/// Crawler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrawlerState {
    /// Idle; a finished run leaves the crawler here
    Ready,
    /// Scan in progress
    Running,
    /// Stop requested
    Stopping,
    /// Stopped without completing
    Stopped,
}

impl CrawlerState {
    /// Whether polling should stop at this state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CrawlerState::Ready | CrawlerState::Stopping | CrawlerState::Stopped
        )
    }
}

impl std::fmt::Display for CrawlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CrawlerState::Ready => "READY",
            CrawlerState::Running => "RUNNING",
            CrawlerState::Stopping => "STOPPING",
            CrawlerState::Stopped => "STOPPED",
        };
        f.write_str(s)
    }
}

/// Table counts from the most recent completed crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastCrawl {
    pub tables_created: usize,
    pub tables_updated: usize,
    pub tables_deleted: usize,
}

/// Crawler state plus last-crawl summary
#[derive(Debug, Clone)]
pub struct CrawlerStatus {
    /// Current lifecycle state
    pub state: CrawlerState,
    /// Summary of the last completed crawl, if any
    pub last_crawl: Option<LastCrawl>,
}

/// Result of verifying one raw source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceCheck {
    /// Whether the object exists
    pub found: bool,
    /// Object size in bytes when found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// The discovery report artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogReport {
    /// Database the tables live in
    pub database_name: String,
    /// Number of discovered tables
    pub total_tables: usize,
    /// Wall-clock timestamp of report generation
    pub discovery_timestamp: String,
    /// Discovered tables
    pub tables: Vec<TableSchema>,
}
