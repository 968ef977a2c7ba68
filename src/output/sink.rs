//! Output destinations
//!
//! Transformed datasets land as Parquet under
//! `<destination>/<stage>/<dataset>/`, with Hive-style
//! `platform=<value>/` partition directories when the dataset carries a
//! `platform` column. The destination is a local directory or an
//! `s3://bucket/prefix` URL, both behind `object_store`.

use super::schema::rows_to_arrow;
use super::writer::{encode_batch, ParquetWriterConfig};
use crate::error::{Error, Result};
use crate::types::{Dataset, Row};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Hive convention for a missing partition value
const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Directory for one dataset under the stage prefix
pub fn dataset_dir(stage: &str, dataset: &str) -> String {
    format!("{}/{dataset}", stage.trim_matches('/'))
}

/// Hive-style partition directory for one platform value
pub fn partition_dir(stage: &str, dataset: &str, platform: &str) -> String {
    let value = platform.replace('/', "_");
    format!("{}/platform={value}", dataset_dir(stage, dataset))
}

/// Parquet output destination
#[derive(Debug, Clone)]
pub struct OutputSink {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl OutputSink {
    /// Parse a destination: `s3://bucket/prefix` or a local directory
    pub fn parse(destination: &str) -> Result<Self> {
        if let Some(without_scheme) = destination.strip_prefix("s3://") {
            let (bucket, prefix) = match without_scheme.find('/') {
                Some(idx) => (
                    &without_scheme[..idx],
                    without_scheme[idx + 1..].trim_matches('/').to_string(),
                ),
                None => (without_scheme, String::new()),
            };
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;
            Ok(Self {
                store: Arc::new(store),
                prefix,
            })
        } else {
            std::fs::create_dir_all(destination)?;
            let store = LocalFileSystem::new_with_prefix(destination)?;
            Ok(Self {
                store: Arc::new(store),
                prefix: String::new(),
            })
        }
    }

    /// Create a sink over an existing object store (used by tests)
    pub fn from_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        self.prefix = self.prefix.trim_matches('/').to_string();
        self
    }

    fn object_path(&self, relative: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(relative)
        } else {
            ObjectPath::from(format!("{}/{relative}", self.prefix))
        }
    }

    async fn put_parquet(
        &self,
        relative: &str,
        columns: &[crate::types::ColumnSpec],
        rows: &[&Row],
        exclude: &[&str],
        config: &ParquetWriterConfig,
    ) -> Result<String> {
        let batch = rows_to_arrow(columns, rows, exclude)?;
        let encoded = encode_batch(&batch, config)?;
        let path = self.object_path(relative);
        self.store.put(&path, Bytes::from(encoded).into()).await?;
        Ok(path.to_string())
    }

    /// Write a dataset, partitioned by `platform` when the column exists
    ///
    /// A failed partitioned write falls back to a single unpartitioned file
    /// with a warning. Returns the object paths written.
    pub async fn write_dataset(
        &self,
        stage: &str,
        dataset: &Dataset,
        config: &ParquetWriterConfig,
    ) -> Result<Vec<String>> {
        if dataset.has_column("platform") {
            match self.write_partitioned(stage, dataset, config).await {
                Ok(paths) => return Ok(paths),
                Err(e) => {
                    warn!(
                        "Partitioned write failed for {}: {e}; retrying without partitioning",
                        dataset.name
                    );
                }
            }
        }
        self.write_unpartitioned(stage, dataset, config).await
    }

    async fn write_partitioned(
        &self,
        stage: &str,
        dataset: &Dataset,
        config: &ParquetWriterConfig,
    ) -> Result<Vec<String>> {
        let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
        for row in &dataset.rows {
            let platform = match row.get("platform") {
                Some(Value::String(s)) => s.clone(),
                _ => DEFAULT_PARTITION.to_string(),
            };
            groups.entry(platform).or_default().push(row);
        }

        let mut written = Vec::with_capacity(groups.len());
        for (platform, rows) in &groups {
            let relative = format!(
                "{}/part-00000.parquet",
                partition_dir(stage, &dataset.name, platform)
            );
            // Hive layout: the partition column lives in the path, not the file
            let path = self
                .put_parquet(&relative, &dataset.columns, rows, &["platform"], config)
                .await?;
            info!("Wrote {} rows to {path}", rows.len());
            written.push(path);
        }
        Ok(written)
    }

    async fn write_unpartitioned(
        &self,
        stage: &str,
        dataset: &Dataset,
        config: &ParquetWriterConfig,
    ) -> Result<Vec<String>> {
        let relative = format!(
            "{}/part-00000.parquet",
            dataset_dir(stage, &dataset.name)
        );
        let rows: Vec<&Row> = dataset.rows.iter().collect();
        let path = self
            .put_parquet(&relative, &dataset.columns, &rows, &[], config)
            .await?;
        info!("Wrote {} rows to {path}", rows.len());
        Ok(vec![path])
    }
}
