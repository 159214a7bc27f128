use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs extract, transform and load one after another.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Returns the location of the results file.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting product listing run");
        self.monitor.log_stats("start");

        tracing::info!("Ingesting catalogs...");
        let catalogs = self.pipeline.extract().await?;
        tracing::info!(
            "Ingested {} products, {} listings from {} manufacturers",
            catalogs.products.len(),
            catalogs.listings.listing_count(),
            catalogs.listings.len()
        );
        self.monitor.log_stats("ingest");

        tracing::info!("Matching listings to products...");
        let association = self.pipeline.transform(catalogs).await?;
        tracing::info!(
            "Matched {} listings across {} products",
            association.listing_count(),
            association.len()
        );
        self.monitor.log_stats("match");

        tracing::info!("Writing results...");
        let output_path = self.pipeline.load(association).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("emit");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
