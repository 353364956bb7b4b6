use itertools::Itertools;
use latency_grader_core::prelude::RunReport;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

/// Summary of a benchmark run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// The unique run id
    ///
    /// Chosen by the runner unless one was given on the command line.
    pub run_id: String,
    /// The name of the benchmark that was run
    pub benchmark_name: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The base address of the system under test
    pub target_url: String,
    /// The number of requests sent for each scenario
    pub iterations: usize,
    /// The per-request timeout, in milliseconds
    ///
    /// Failed and timed out requests were scored as taking this long.
    pub timeout_ms: u64,
    /// Where attempt latencies were taken from, server reported or wall-clock
    pub timing_policy: String,
    /// The graded results of the run
    pub report: RunReport,
    /// The version of the grader that produced this run
    pub grader_version: String,
}

impl RunSummary {
    /// Create a new run summary
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_id: String,
        benchmark_name: String,
        started_at: i64,
        target_url: String,
        iterations: usize,
        timeout_ms: u64,
        timing_policy: String,
        report: RunReport,
        grader_version: String,
    ) -> Self {
        Self {
            run_id,
            benchmark_name,
            started_at,
            target_url,
            iterations,
            timeout_ms,
            timing_policy,
            report,
            grader_version,
        }
    }

    /// Compute a fingerprint for this run summary
    ///
    /// The fingerprint identifies runs that were graded the same way, so that their grades can be
    /// compared. It uses the
    ///     - Benchmark name
    ///     - Iterations and timeout
    ///     - Timing policy
    ///     - Scenario names and targets
    ///     - Grader version
    ///
    /// The target address is not included, the same benchmark may be pointed at different
    /// deployments. The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.benchmark_name.as_bytes());
        Digest::update(&mut hasher, (self.iterations as u64).to_le_bytes());
        Digest::update(&mut hasher, self.timeout_ms.to_le_bytes());
        Digest::update(&mut hasher, self.timing_policy.as_bytes());
        self.report
            .results
            .iter()
            .map(|r| (r.scenario.name(), r.scenario.target_latency_ms()))
            .sorted_by(|a, b| a.0.cmp(b.0))
            .for_each(|(name, target)| {
                Digest::update(&mut hasher, name.as_bytes());
                Digest::update(&mut hasher, target.to_le_bytes());
            });
        Digest::update(&mut hasher, self.grader_version.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Append the run summary to a file
///
/// The summary will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_run_summary(run_summary: RunSummary, path: PathBuf) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_run_summary(run_summary, &mut file)?;
    file.write_all("\n".as_bytes())?;
    Ok(())
}

/// Serialize the run summary to a writer
pub fn store_run_summary<W: Write>(run_summary: RunSummary, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, &run_summary)?;
    Ok(())
}

/// Load a run summary from a reader
pub fn load_run_summary<R: Read>(reader: R) -> anyhow::Result<RunSummary> {
    let reader = std::io::BufReader::new(reader);
    let run_summary: RunSummary = serde_json::from_reader(reader)?;
    Ok(run_summary)
}

/// Load run summaries from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_run_summary]. Blank lines are skipped.
pub fn load_summary_runs(path: PathBuf) -> anyhow::Result<Vec<RunSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut runs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let run: RunSummary = serde_json::from_str(&line)?;
        runs.push(run);
    }
    Ok(runs)
}
