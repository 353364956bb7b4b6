mod json_report;
mod summary_report;

use std::path::PathBuf;
use std::time::Duration;

use latency_grader_core::prelude::{RunReport, ScenarioResult};

pub use json_report::JsonReportCollector;
pub use summary_report::SummaryReportCollector;

/// Describes the run that is about to start.
#[derive(Debug, Clone)]
pub struct RunHeader {
    pub benchmark_name: String,
    pub target: String,
    pub iterations: usize,
    pub timeout: Duration,
}

pub trait ReportCollector {
    /// Called once before the first scenario is sampled.
    fn begin(&mut self, _header: &RunHeader) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called as each scenario completes, in catalog order.
    fn add_scenario_result(&mut self, _result: &ScenarioResult) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once with the complete report.
    fn finalize(&mut self, report: &RunReport) -> anyhow::Result<()>;
}

/// Choose which collectors will receive the results of a run.
///
/// With nothing enabled the resulting [Reporter] discards everything.
#[derive(Debug, Default)]
pub struct ReportConfig {
    summary: Option<bool>,
    json_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Print a summary table and the final verdict to stdout.
    pub fn enable_summary(mut self, color: bool) -> Self {
        self.summary = Some(color);
        self
    }

    /// Write the report as JSON to a new file in `dir`.
    pub fn enable_json(mut self, dir: PathBuf) -> Self {
        self.json_dir = Some(dir);
        self
    }

    pub fn init(self) -> Reporter {
        let mut collectors: Vec<Box<dyn ReportCollector>> = Vec::new();

        if let Some(color) = self.summary {
            collectors.push(Box::new(SummaryReportCollector::new(color)));
        }
        if let Some(dir) = self.json_dir {
            collectors.push(Box::new(JsonReportCollector::new(dir)));
        }

        Reporter::new(collectors)
    }
}

/// Fans results out to every configured collector.
pub struct Reporter {
    collectors: Vec<Box<dyn ReportCollector>>,
}

impl Reporter {
    pub fn new(collectors: Vec<Box<dyn ReportCollector>>) -> Self {
        Self { collectors }
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}

impl ReportCollector for Reporter {
    fn begin(&mut self, header: &RunHeader) -> anyhow::Result<()> {
        for collector in &mut self.collectors {
            collector.begin(header)?;
        }
        Ok(())
    }

    fn add_scenario_result(&mut self, result: &ScenarioResult) -> anyhow::Result<()> {
        for collector in &mut self.collectors {
            collector.add_scenario_result(result)?;
        }
        Ok(())
    }

    /// Every collector is given the report, even if an earlier one fails. The first error is
    /// returned.
    fn finalize(&mut self, report: &RunReport) -> anyhow::Result<()> {
        let mut first_error = None;
        for collector in &mut self.collectors {
            if let Err(e) = collector.finalize(report) {
                log::error!("Failed to finalize report: {e:?}");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
