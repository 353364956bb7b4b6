mod results_table;

use std::io::Write;

use anyhow::Context;
use latency_grader_core::prelude::{RunReport, ScenarioResult, Verdict};
use tabled::settings::Style;
use tabled::Table;

use crate::report::summary_report::results_table::ScenarioRow;
use crate::report::{ReportCollector, RunHeader};

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

/// Prints a human readable summary of the run: a banner when the run starts, then a table of
/// scenario results with the final grade and verdict once it completes.
pub struct SummaryReportCollector {
    writer: Box<dyn Write>,
    color: bool,
    rows: Vec<ScenarioRow>,
}

impl SummaryReportCollector {
    pub fn new(color: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), color)
    }

    pub fn with_writer(writer: Box<dyn Write>, color: bool) -> Self {
        Self {
            writer,
            color,
            rows: Vec::new(),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Row status color, by how many points the scenario earned.
    fn score_color(score: f64) -> &'static str {
        if score > 80.0 {
            GREEN
        } else if score < 30.0 {
            RED
        } else {
            YELLOW
        }
    }

    fn verdict_color(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Critical => RED,
            Verdict::Slow => YELLOW,
            Verdict::ProductionReady => GREEN,
        }
    }
}

impl ReportCollector for SummaryReportCollector {
    fn begin(&mut self, header: &RunHeader) -> anyhow::Result<()> {
        let banner = self.paint(
            YELLOW,
            &format!("--- STARTING BENCHMARK: {} ---", header.benchmark_name),
        );
        writeln!(self.writer, "{banner}")?;
        writeln!(self.writer, "Target: {}", header.target)?;
        writeln!(self.writer, "Iterations per endpoint: {}", header.iterations)?;
        writeln!(
            self.writer,
            "Timeout per request: {:.1}s\n",
            header.timeout.as_secs_f64()
        )?;
        self.writer.flush().context("Failed to write run header")?;
        Ok(())
    }

    fn add_scenario_result(&mut self, result: &ScenarioResult) -> anyhow::Result<()> {
        let mut row = ScenarioRow::from(result);
        row.status = self.paint(Self::score_color(result.score), &row.status);
        self.rows.push(row);
        Ok(())
    }

    fn finalize(&mut self, report: &RunReport) -> anyhow::Result<()> {
        let mut table = Table::new(&self.rows);
        table.with(Style::modern());
        writeln!(self.writer, "{table}")?;

        let grade = self.paint(
            YELLOW,
            &format!("FINAL SYSTEM GRADE: {:.2}%", report.final_grade_pct),
        );
        writeln!(self.writer, "\n{grade}")?;

        let verdict = self.paint(
            Self::verdict_color(report.verdict),
            &format!("VERDICT: {}", report.verdict.message()),
        );
        writeln!(self.writer, "{verdict}")?;

        self.writer.flush().context("Failed to write summary report")?;
        Ok(())
    }
}
