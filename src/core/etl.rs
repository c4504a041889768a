use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;

/// Drives a pipeline through load, dedupe/format and render/write, printing
/// progress counts to stdout.
pub struct DirectoryEngine<P: Pipeline> {
    pipeline: P,
    monitor: StageMonitor,
}

impl<P: Pipeline> DirectoryEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: StageMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("🚀 Building contact directory");
        self.monitor.log_stage("Start");

        let raw_contacts = self.pipeline.extract()?;
        println!("Raw contacts loaded: {}", raw_contacts.len());
        self.monitor.log_stage("Load");

        let result = self.pipeline.transform(raw_contacts)?;
        println!("Unique contacts: {}", result.stats.unique_count);
        println!("Duplicates removed: {}", result.stats.duplicate_count);
        tracing::info!(
            "Follow-up contacts: {}, total turnover: {}k",
            result.stats.follow_up_count,
            result.stats.total_turnover_k
        );
        self.monitor.log_stage("Dedupe and format");

        let output_path = self.pipeline.load(result)?;
        println!("Wrote HTML to: {}", output_path);
        self.monitor.log_stage("Render and write");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
