//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tourism dataset ETL pipeline
#[derive(Parser, Debug)]
#[command(name = "wisata-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, global = true, default_value = "pipeline.yaml")]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that every configured raw source file exists
    Verify,

    /// Run schema discovery: ensure the database, define and run the
    /// crawler, save the catalog report
    Setup {
        /// Directory the catalog report is written to
        #[arg(long, default_value = ".")]
        report_dir: PathBuf,
    },

    /// Run the transform pipeline (schema discovery runs first so the
    /// catalog is populated)
    Run,

    /// Print the discovered-table report as JSON
    Report,

    /// Validate the pipeline configuration
    Validate,
}
