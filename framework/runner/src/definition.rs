use std::path::PathBuf;
use std::time::Duration;

use latency_grader_core::prelude::{ConfigurationError, RequestSpec, Scenario, ScenarioCatalog};
use latency_grader_instruments::ReportConfig;
use url::Url;

use crate::catalog::load_catalog;
use crate::cli::{GraderCli, ReporterOpt};
use crate::sampler::TimingPolicy;

/// Environment variable naming a file to append run summaries to
const RUN_SUMMARY_PATH_ENV: &str = "RUN_SUMMARY_PATH";

const DEFAULT_ITERATIONS: usize = 5;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The builder for a benchmark definition.
///
/// This must be used at the start of a benchmark binary to define the scenarios you want to grade.
/// Values given on the command line take precedence over the defaults set here.
pub struct BenchmarkDefinitionBuilder {
    /// The name of the benchmark.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: GraderCli,
    default_iterations: Option<usize>,
    default_timeout: Option<Duration>,
    /// Scenarios in catalog order, validated when the definition is built.
    scenarios: Vec<(String, RequestSpec, f64)>,
}

/// A validated benchmark, ready to run.
#[derive(Debug)]
pub struct BenchmarkDefinition {
    pub name: String,
    pub catalog: ScenarioCatalog,
    pub target_url: Url,
    pub iterations: usize,
    pub timeout: Duration,
    pub timing_policy: TimingPolicy,
    pub process_time_header: String,
    pub reporters: Vec<ReporterOpt>,
    pub report_dir: PathBuf,
    pub no_progress: bool,
    pub no_color: bool,
    pub run_summary_path: Option<PathBuf>,
    pub run_id: Option<String>,
}

impl BenchmarkDefinitionBuilder {
    pub fn new(name: &str, cli: GraderCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            default_iterations: None,
            default_timeout: None,
            scenarios: Vec::new(),
        }
    }

    /// Set the number of requests per scenario, used if none is given on the command line.
    pub fn with_default_iterations(mut self, iterations: usize) -> Self {
        self.default_iterations = Some(iterations);
        self
    }

    /// Set the request timeout, used if none is given on the command line.
    pub fn with_default_timeout_s(mut self, timeout_s: u64) -> Self {
        self.default_timeout = Some(Duration::from_secs(timeout_s));
        self
    }

    /// Add a scenario to the end of the built-in catalog.
    pub fn add_scenario(mut self, name: &str, request: RequestSpec, target_latency_ms: f64) -> Self {
        self.scenarios
            .push((name.to_string(), request, target_latency_ms));
        self
    }

    pub fn build(self) -> anyhow::Result<BenchmarkDefinition> {
        let catalog = match &self.cli.catalog {
            Some(path) => {
                log::debug!("Using scenario catalog from {}", path.display());
                load_catalog(path)?
            }
            None => ScenarioCatalog::new(
                self.scenarios
                    .into_iter()
                    .map(|(name, request, target)| Scenario::new(name, request, target))
                    .collect::<Result<Vec<_>, _>>()?,
            )?,
        };

        let iterations = self
            .cli
            .iterations
            .or(self.default_iterations)
            .unwrap_or(DEFAULT_ITERATIONS);
        if iterations == 0 {
            return Err(ConfigurationError::NonPositiveIterationCount.into());
        }

        let timeout = match self.cli.timeout_s {
            Some(timeout_s) => Duration::try_from_secs_f64(timeout_s).map_err(|_| {
                if timeout_s.is_nan() || timeout_s > 0.0 {
                    ConfigurationError::TimeoutOutOfRange { timeout_s }
                } else {
                    ConfigurationError::NonPositiveTimeout
                }
            })?,
            None => self.default_timeout.unwrap_or(DEFAULT_TIMEOUT),
        };
        if timeout.is_zero() {
            return Err(ConfigurationError::NonPositiveTimeout.into());
        }

        let target_url = parse_target_url(&self.cli.target_url)?;

        let run_summary_path = self
            .cli
            .run_summary
            .or_else(|| std::env::var(RUN_SUMMARY_PATH_ENV).ok().map(PathBuf::from));

        Ok(BenchmarkDefinition {
            name: self.name,
            catalog,
            target_url,
            iterations,
            timeout,
            timing_policy: self.cli.timing,
            process_time_header: self.cli.process_time_header,
            reporters: self.cli.reporter,
            report_dir: self.cli.report_dir,
            no_progress: self.cli.no_progress,
            no_color: self.cli.no_color,
            run_summary_path,
            run_id: self.cli.run_id,
        })
    }
}

impl BenchmarkDefinition {
    /// Collectors selected on the command line, the summary table if none were.
    pub fn report_config(&self) -> ReportConfig {
        let reporters = if self.reporters.is_empty() {
            &[ReporterOpt::Summary][..]
        } else {
            &self.reporters[..]
        };

        reporters
            .iter()
            .fold(ReportConfig::default(), |config, reporter| match reporter {
                ReporterOpt::Summary => config.enable_summary(!self.no_color),
                ReporterOpt::Json => config.enable_json(self.report_dir.clone()),
                ReporterOpt::Noop => config,
            })
    }
}

fn parse_target_url(raw: &str) -> Result<Url, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("no host".to_string()));
    }

    Ok(url)
}
