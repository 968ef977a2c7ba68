//! Error types for the wisata-etl pipeline
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-field failures (casts, date parsing, classification) are not errors:
//! they degrade to null / `unknown` inside the transform layer and never
//! reach this type.

use thiserror::Error;

/// The main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Crawler '{name}' failed: {message}")]
    Crawler { name: String, message: String },

    #[error("Source '{source_name}' not readable: {message}")]
    SourceRead { source_name: String, message: String },

    #[error("Table '{table}' not found in database '{database}'")]
    TableNotFound { database: String, table: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Invalid storage path: {0}")]
    StorePath(#[from] object_store::path::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a crawler error
    pub fn crawler(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crawler {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a source read error
    pub fn source_read(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            source_name: source.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("bucket");
        assert_eq!(err.to_string(), "Missing required config field: bucket");

        let err = Error::crawler("tourism-crawler", "stuck");
        assert_eq!(err.to_string(), "Crawler 'tourism-crawler' failed: stuck");
    }

    #[test]
    fn test_table_not_found_display() {
        let err = Error::TableNotFound {
            database: "tourism_db".to_string(),
            table: "raw_json".to_string(),
        };
        assert!(err.to_string().contains("tourism_db"));
        assert!(err.to_string().contains("raw_json"));
    }
}
