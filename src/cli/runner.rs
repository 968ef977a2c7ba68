//! CLI runner - executes commands

use crate::catalog::{CatalogService, CrawlerController, LocalCatalog};
use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::pipeline::TransformPipeline;
use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Verify => self.verify().await,
            Commands::Setup { report_dir } => self.setup(report_dir).await,
            Commands::Run => self.run_pipeline().await,
            Commands::Report => self.report().await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the pipeline configuration
    fn load_config(&self) -> Result<PipelineConfig> {
        PipelineConfig::from_file(&self.cli.config)
    }

    /// Build the catalog service over the configured raw zone
    ///
    /// `s3://bucket` uses the S3 backend; anything else is treated as a
    /// local directory.
    fn build_catalog(&self, config: &PipelineConfig) -> Result<Arc<dyn CatalogService>> {
        if let Some(bucket) = config.bucket.strip_prefix("s3://") {
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;
            Ok(Arc::new(LocalCatalog::new(
                Arc::new(store) as Arc<dyn ObjectStore>
            )))
        } else {
            Ok(Arc::new(LocalCatalog::for_directory(&config.bucket)?))
        }
    }

    fn controller(&self) -> Result<(PipelineConfig, CrawlerController)> {
        let config = self.load_config()?;
        let service = self.build_catalog(&config)?;
        let controller = CrawlerController::new(service, config.clone());
        Ok((config, controller))
    }

    async fn verify(&self) -> Result<()> {
        let (_, controller) = self.controller()?;
        let checks = controller.verify_sources().await?;
        println!("{}", serde_json::to_string_pretty(&checks)?);
        Ok(())
    }

    async fn setup(&self, report_dir: &Path) -> Result<()> {
        let (_, controller) = self.controller()?;
        let report = controller.setup(report_dir).await?;
        println!(
            "Schema discovery completed: {} tables in '{}'",
            report.total_tables, report.database_name
        );
        Ok(())
    }

    async fn run_pipeline(&self) -> Result<()> {
        let config = self.load_config()?;
        let service = self.build_catalog(&config)?;

        // Phase 1 populates the catalog the transform phase reads from
        let controller = CrawlerController::new(service.clone(), config.clone());
        controller.ensure_database().await?;
        let handle = controller.define_crawler().await?;
        controller.run_crawler(&handle).await?;

        let pipeline = TransformPipeline::new(service, config)?;
        if pipeline.run_logged().await {
            Ok(())
        } else {
            Err(Error::Other("ETL job failed".to_string()))
        }
    }

    async fn report(&self) -> Result<()> {
        let config = self.load_config()?;
        let service = self.build_catalog(&config)?;
        let controller = CrawlerController::new(service, config);

        controller.ensure_database().await?;
        let handle = controller.define_crawler().await?;
        controller.run_crawler(&handle).await?;

        let report = controller.catalog_report().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        println!("Configuration OK");
        println!("  database: {}", config.database);
        println!("  bucket: {}", config.bucket);
        println!("  sources: {}", config.source_paths.len());
        println!(
            "  output: {}/{}",
            config.output.destination, config.output.stage
        );
        Ok(())
    }
}
