//! In-process catalog implementation
//!
//! Stands in for the managed catalog/crawler service: tables live in
//! memory, the raw zone is any `object_store` backend, and a crawl is a
//! spawned scan task so callers observe the same `RUNNING → READY`
//! lifecycle they would get from the real service.

use super::service::CatalogService;
use super::types::{
    CrawlerHandle, CrawlerSpec, CrawlerState, CrawlerStatus, LastCrawl, TableSchema,
};
use crate::error::{Error, Result};
use crate::schema;
use async_trait::async_trait;
use futures::StreamExt;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Hive-compatible format identifiers reported for raw JSON tables
const JSON_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
const JSON_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";

#[derive(Default)]
struct CatalogState {
    databases: BTreeSet<String>,
    crawlers: BTreeMap<String, CrawlerSpec>,
    statuses: BTreeMap<String, CrawlerStatus>,
    /// database -> table name -> schema
    tables: BTreeMap<String, BTreeMap<String, TableSchema>>,
}

/// In-process [`CatalogService`] over an `object_store` backend
#[derive(Clone)]
pub struct LocalCatalog {
    store: Arc<dyn ObjectStore>,
    state: Arc<Mutex<CatalogState>>,
}

impl LocalCatalog {
    /// Create a catalog over an existing object store
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(CatalogState::default())),
        }
    }

    /// Create a catalog over a local directory (created if missing)
    pub fn for_directory(path: impl AsRef<std::path::Path>) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        let store = LocalFileSystem::new_with_prefix(path)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Scan every target of a crawler spec and build its table map
    async fn scan(store: &Arc<dyn ObjectStore>, spec: &CrawlerSpec) -> Result<BTreeMap<String, TableSchema>> {
        let mut tables = BTreeMap::new();

        for target in &spec.targets {
            let prefix = ObjectPath::from(target.path.trim_matches('/'));
            let mut listing = store.list(Some(&prefix));

            while let Some(meta) = listing.next().await {
                let meta = meta?;
                let filename = meta.location.filename().unwrap_or_default().to_string();
                if target.excludes(&filename) {
                    debug!("Skipping excluded object {}", meta.location);
                    continue;
                }

                let bytes = store.get(&meta.location).await?.bytes().await?;
                let records = match parse_records(&bytes, meta.location.as_ref()) {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("Skipping unparseable object {}: {e}", meta.location);
                        continue;
                    }
                };

                let columns = schema::infer_columns(&records)
                    .into_iter()
                    .map(|(name, ty)| super::types::ColumnDef::new(name, ty.render()))
                    .collect();

                let table_name = format!("{}{}", spec.table_prefix, table_stem(&filename));
                tables.insert(
                    table_name.clone(),
                    TableSchema {
                        name: table_name,
                        location: meta.location.to_string(),
                        input_format: JSON_INPUT_FORMAT.to_string(),
                        output_format: JSON_OUTPUT_FORMAT.to_string(),
                        columns,
                        row_count: Some(records.len() as u64),
                        file_size: Some(meta.size as u64),
                    },
                );
            }
        }

        Ok(tables)
    }

    /// One crawl run: scan, register tables, transition to a terminal state
    async fn run_crawl(store: Arc<dyn ObjectStore>, state: Arc<Mutex<CatalogState>>, spec: CrawlerSpec) {
        let result = Self::scan(&store, &spec).await;
        let mut guard = state.lock().await;

        match result {
            Ok(scanned) => {
                let db_tables = guard.tables.entry(spec.database.clone()).or_default();
                let mut summary = LastCrawl::default();
                for (name, table) in scanned {
                    if db_tables.insert(name, table).is_some() {
                        summary.tables_updated += 1;
                    } else {
                        summary.tables_created += 1;
                    }
                }
                info!(
                    "Crawler {} finished: {} created, {} updated",
                    spec.name, summary.tables_created, summary.tables_updated
                );
                guard.statuses.insert(
                    spec.name,
                    CrawlerStatus {
                        state: CrawlerState::Ready,
                        last_crawl: Some(summary),
                    },
                );
            }
            Err(e) => {
                warn!("Crawler {} stopped: {e}", spec.name);
                guard.statuses.insert(
                    spec.name,
                    CrawlerStatus {
                        state: CrawlerState::Stopped,
                        last_crawl: None,
                    },
                );
            }
        }
    }
}

#[async_trait]
impl CatalogService for LocalCatalog {
    async fn head_object(&self, location: &str) -> Result<Option<u64>> {
        let path = ObjectPath::parse(location)?;
        match self.store.head(&path).await {
            Ok(meta) => Ok(Some(meta.size as u64)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_database(&self, name: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.databases.insert(name.to_string()) {
            info!("Created database: {name}");
        } else {
            info!("Database {name} already exists");
        }
        Ok(())
    }

    async fn put_crawler(&self, spec: CrawlerSpec) -> Result<CrawlerHandle> {
        let mut guard = self.state.lock().await;
        let name = spec.name.clone();
        let existing = guard.crawlers.insert(name.clone(), spec);
        if existing.is_some() {
            info!("Updated existing crawler {name}");
        } else {
            info!("Created crawler {name}");
            guard.statuses.insert(
                name.clone(),
                CrawlerStatus {
                    state: CrawlerState::Ready,
                    last_crawl: None,
                },
            );
        }
        Ok(CrawlerHandle { name })
    }

    async fn start_crawler(&self, handle: &CrawlerHandle) -> Result<()> {
        let spec = {
            let mut guard = self.state.lock().await;
            let spec = guard
                .crawlers
                .get(&handle.name)
                .cloned()
                .ok_or_else(|| Error::crawler(&handle.name, "crawler not defined"))?;
            guard.statuses.insert(
                handle.name.clone(),
                CrawlerStatus {
                    state: CrawlerState::Running,
                    last_crawl: None,
                },
            );
            spec
        };

        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        tokio::spawn(Self::run_crawl(store, state, spec));
        Ok(())
    }

    async fn crawler_state(&self, handle: &CrawlerHandle) -> Result<CrawlerStatus> {
        let guard = self.state.lock().await;
        guard
            .statuses
            .get(&handle.name)
            .cloned()
            .ok_or_else(|| Error::crawler(&handle.name, "crawler not defined"))
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<TableSchema>> {
        let guard = self.state.lock().await;
        Ok(guard
            .tables
            .get(database)
            .map(|tables| tables.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn read_records(&self, database: &str, table: &str) -> Result<Vec<Value>> {
        let location = {
            let guard = self.state.lock().await;
            guard
                .tables
                .get(database)
                .and_then(|tables| tables.get(table))
                .map(|t| t.location.clone())
                .ok_or_else(|| Error::TableNotFound {
                    database: database.to_string(),
                    table: table.to_string(),
                })?
        };

        let path = ObjectPath::parse(&location)?;
        let bytes = self.store.get(&path).await?.bytes().await?;
        parse_records(&bytes, &location)
    }
}

/// Parse a raw source file: a single JSON document (array-wrapped records
/// or one object) or newline-delimited JSON
fn parse_records(bytes: &[u8], location: &str) -> Result<Vec<Value>> {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        return Ok(match value {
            Value::Array(records) => records,
            other => vec![other],
        });
    }

    // Fall back to JSONL
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::source_read(location, format!("not UTF-8: {e}")))?;
    let mut records = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| {
            Error::source_read(location, format!("bad JSON at line {}: {e}", line_num + 1))
        })?;
        records.push(value);
    }
    Ok(records)
}

/// Normalize a filename into a catalog table stem
fn table_stem(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map_or(filename, |(s, _)| s);
    let mut out = String::with_capacity(stem.len());
    let mut last_was_sep = false;
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}
