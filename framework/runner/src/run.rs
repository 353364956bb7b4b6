use anyhow::Context;
use chrono::Utc;
use latency_grader_core::prelude::{aggregate, score, RunReport};
use latency_grader_instruments::{ReportCollector, Reporter, RunHeader};
use latency_grader_summary_model::{append_run_summary, RunSummary};

use crate::definition::{BenchmarkDefinition, BenchmarkDefinitionBuilder};
use crate::progress::AttemptProgress;
use crate::sampler::Sampler;
use crate::transport::{HttpTransport, Transport};

/// Build the benchmark definition, run every scenario against the target over HTTP and report the
/// results.
pub fn run(definition: BenchmarkDefinitionBuilder) -> anyhow::Result<RunReport> {
    let definition = definition.build()?;

    let transport = HttpTransport::new(
        definition.target_url.clone(),
        &definition.process_time_header,
    );
    let reporter = definition.report_config().init();

    run_with(definition, transport, reporter)
}

/// Run every scenario of a validated definition through the given transport.
///
/// Scenarios are sampled one at a time in catalog order and the report keeps that order.
pub fn run_with<T: Transport>(
    definition: BenchmarkDefinition,
    transport: T,
    mut reporter: Reporter,
) -> anyhow::Result<RunReport> {
    log::info!("Running benchmark: {}", definition.name);
    log::debug!(
        "Target {}, {} iterations per scenario, timeout {:?}, timing {}",
        definition.target_url,
        definition.iterations,
        definition.timeout,
        definition.timing_policy
    );

    let started_at = Utc::now().timestamp();
    let sampler = Sampler::new(transport, definition.timing_policy);

    reporter.begin(&RunHeader {
        benchmark_name: definition.name.clone(),
        target: definition.target_url.to_string(),
        iterations: definition.iterations,
        timeout: definition.timeout,
    })?;

    let mut results = Vec::with_capacity(definition.catalog.len());
    for scenario in &definition.catalog {
        log::info!("Sampling [{}]: {}", scenario.name(), scenario.request());

        let mut progress = if definition.no_progress {
            AttemptProgress::hidden()
        } else {
            AttemptProgress::start(scenario.name(), definition.iterations)?
        };
        let samples = sampler.sample(
            scenario,
            definition.iterations,
            definition.timeout,
            &mut progress,
        )?;
        progress.finish();

        let result = score(scenario, &samples)?;
        reporter.add_scenario_result(&result)?;
        results.push(result);
    }

    let report = aggregate(results);
    log::info!(
        "Benchmark {} finished with grade {:.2}%: {}",
        definition.name,
        report.final_grade_pct,
        report.verdict
    );

    reporter.finalize(&report)?;

    if let Some(path) = &definition.run_summary_path {
        let summary = RunSummary::new(
            definition
                .run_id
                .clone()
                .unwrap_or_else(|| nanoid::nanoid!()),
            definition.name.clone(),
            started_at,
            definition.target_url.to_string(),
            definition.iterations,
            definition.timeout.as_millis() as u64,
            definition.timing_policy.to_string(),
            report.clone(),
            env!("CARGO_PKG_VERSION").to_string(),
        );

        // Losing the summary does not fail the run.
        if let Err(e) = append_run_summary(summary, path.clone())
            .with_context(|| format!("Failed to append run summary to {}", path.display()))
        {
            log::warn!("{e:?}");
        }
    }

    Ok(report)
}
