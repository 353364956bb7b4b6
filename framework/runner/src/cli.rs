use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::sampler::TimingPolicy;
use crate::transport::DEFAULT_PROCESS_TIME_HEADER;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct GraderCli {
    /// Base address of the system under test. Scenario paths are appended to it.
    #[clap(short, long, default_value = "http://localhost:8000")]
    pub target_url: String,

    /// The number of requests to send for each scenario
    #[clap(short, long)]
    pub iterations: Option<usize>,

    /// The number of seconds to wait for a single request before treating it as timed out.
    ///
    /// Requests that time out or fail are scored as if they took this long.
    #[clap(long)]
    pub timeout_s: Option<f64>,

    /// Where each attempt's latency is taken from.
    ///
    /// `prefer-server-reported` uses the processing time the target reports about itself, which
    /// excludes network transit, and falls back to the round trip time when it is missing.
    /// `wall-clock` always uses the round trip time.
    #[clap(long, value_enum, default_value_t = TimingPolicy::PreferServerReported)]
    pub timing: TimingPolicy,

    /// The response header carrying the server's processing time, in seconds
    #[clap(long, default_value = DEFAULT_PROCESS_TIME_HEADER)]
    pub process_time_header: String,

    /// Load the scenario catalog from a TOML file instead of using the benchmark's built-in catalog
    #[clap(long)]
    pub catalog: Option<PathBuf>,

    /// Select a reporter. May be given more than once, defaults to `summary`.
    #[clap(long, value_enum)]
    pub reporter: Vec<ReporterOpt>,

    /// Directory the `json` reporter writes its report file into
    #[clap(long, default_value = ".")]
    pub report_dir: PathBuf,

    /// Do not show progress bars while sampling.
    ///
    /// Useful in CI, where nobody watches the bars and they only clutter the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// Do not color the summary output
    #[clap(long, default_value = "false")]
    pub no_color: bool,

    /// Append a summary of this run to a JSON lines file.
    ///
    /// Falls back to the `RUN_SUMMARY_PATH` environment variable. No summary is written if neither
    /// is set.
    #[clap(long)]
    pub run_summary: Option<PathBuf>,

    /// Identifier recorded in the run summary. A random one is chosen if not set.
    #[clap(long)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterOpt {
    /// Print a table of results and the final verdict
    Summary,
    /// Write the report as JSON into `--report-dir`
    Json,
    /// Discard the results
    Noop,
}
