use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use latency_grader_core::prelude::RunReport;

use crate::report::ReportCollector;

/// Writes the complete report as pretty printed JSON to a new, timestamped file.
pub struct JsonReportCollector {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl JsonReportCollector {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, written: None }
    }

    /// The file the report was written to, once finalized.
    pub fn written(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl ReportCollector for JsonReportCollector {
    fn finalize(&mut self, report: &RunReport) -> anyhow::Result<()> {
        let path = self.dir.join(format!(
            "grader-report-{}.json",
            Utc::now().format("%Y-%m-%dT%H.%M.%S%.fZ")
        ));

        let file = File::create_new(&path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        serde_json::to_writer_pretty(file, report).context("Failed to write JSON report")?;

        log::info!("Wrote JSON report to {}", path.display());
        self.written = Some(path);

        Ok(())
    }
}
