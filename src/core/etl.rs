use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

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

    /// Runs load → extract → render once. The first error aborts the run.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting order extraction");

        tracing::info!("📥 Loading document...");
        let xml = self.pipeline.extract().await?;
        tracing::info!("Loaded {} bytes", xml.len());
        self.monitor.log_stats("Load");

        tracing::info!("🔄 Extracting fields...");
        let report = self.pipeline.transform(xml).await?;
        tracing::info!(
            "Extracted summary with {} customer(s)",
            report.customers.len()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("📤 Rendering report...");
        let destination = self.pipeline.load(report).await?;
        tracing::info!("Report written to: {}", destination);
        self.monitor.log_stats("Render");

        self.monitor.log_final_stats();
        Ok(destination)
    }
}
