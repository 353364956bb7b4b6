use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use latency_grader_runner::prelude::*;
use latency_grader_summary_model::load_summary_runs;

/// Answers every request for a path with the same scripted result.
#[derive(Default)]
struct PathTransport {
    responses: HashMap<String, Result<TransportResponse, TransportError>>,
    requests: RefCell<Vec<String>>,
}

impl PathTransport {
    fn respond(mut self, path: &str, response: Result<TransportResponse, TransportError>) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    fn processing_time(self, path: &str, seconds: &str) -> Self {
        self.respond(
            path,
            Ok(TransportResponse {
                status: 200,
                server_processing_time: Some(seconds.to_string()),
            }),
        )
    }
}

impl Transport for PathTransport {
    fn execute(
        &self,
        request: &RequestSpec,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.borrow_mut().push(request.path.clone());
        self.responses
            .get(&request.path)
            .cloned()
            .unwrap_or(Err(TransportError::Timeout { timeout }))
    }
}

/// Records the order results reach a collector.
struct NameRecorder(Rc<RefCell<Vec<String>>>);

impl ReportCollector for NameRecorder {
    fn add_scenario_result(&mut self, result: &ScenarioResult) -> anyhow::Result<()> {
        self.0
            .borrow_mut()
            .push(result.scenario.name().to_string());
        Ok(())
    }

    fn finalize(&mut self, _report: &RunReport) -> anyhow::Result<()> {
        self.0.borrow_mut().push("finalized".to_string());
        Ok(())
    }
}

fn sample_cli_cfg() -> GraderCli {
    GraderCli {
        target_url: "http://localhost:8000".to_string(),
        iterations: None,
        timeout_s: None,
        timing: TimingPolicy::PreferServerReported,
        process_time_header: DEFAULT_PROCESS_TIME_HEADER.to_string(),
        catalog: None,
        reporter: vec![ReporterOpt::Noop],
        report_dir: PathBuf::from("."),
        no_progress: true,
        no_color: true,
        run_summary: None,
        run_id: None,
    }
}

fn three_scenarios(cli: GraderCli) -> BenchmarkDefinitionBuilder {
    BenchmarkDefinitionBuilder::new("pipeline", cli)
        .add_scenario("slow", RequestSpec::get("/slow"), 10.0)
        .add_scenario("fast", RequestSpec::get("/fast"), 10.0)
        .add_scenario("middle", RequestSpec::get("/middle"), 10.0)
}

#[test]
fn results_follow_catalog_order() {
    env_logger::try_init().ok();

    let transport = PathTransport::default()
        .processing_time("/slow", "0.1")
        .processing_time("/fast", "0.005")
        .processing_time("/middle", "0.055");
    let recorded = Rc::new(RefCell::new(Vec::new()));
    let reporter = Reporter::new(vec![Box::new(NameRecorder(recorded.clone()))]);

    let definition = three_scenarios(sample_cli_cfg())
        .with_default_iterations(3)
        .build()
        .unwrap();
    let report = run_with(definition, &transport, reporter).unwrap();

    let names = report
        .results
        .iter()
        .map(|r| r.scenario.name())
        .collect::<Vec<_>>();
    assert_eq!(vec!["slow", "fast", "middle"], names);

    let scores = report.results.iter().map(|r| r.score).collect::<Vec<_>>();
    assert_eq!(vec![0.0, 100.0, 50.0], scores);
    assert_eq!(150.0, report.total_score);
    assert_eq!(300.0, report.max_score);
    assert_eq!(50.0, report.final_grade_pct);
    assert_eq!(Verdict::Slow, report.verdict);

    assert_eq!(
        vec!["slow", "fast", "middle", "finalized"],
        *recorded.borrow()
    );

    // Strictly sequential, every iteration of one scenario before the next
    let requests = transport.requests.borrow();
    assert_eq!(
        vec!["/slow", "/slow", "/slow", "/fast", "/fast", "/fast", "/middle", "/middle", "/middle"],
        *requests
    );
}

#[test]
fn always_timing_out_is_scored_not_fatal() {
    env_logger::try_init().ok();

    // No scripted response, so every request times out
    let transport = PathTransport::default().processing_time("/fast", "0.001");

    let definition = three_scenarios(sample_cli_cfg())
        .with_default_iterations(5)
        .with_default_timeout_s(30)
        .build()
        .unwrap();
    let report = run_with(definition, &transport, Reporter::new(Vec::new())).unwrap();

    let slow = &report.results[0];
    assert_eq!(30_000.0, slow.average_latency_ms);
    assert_eq!(Status::Timeout, slow.status);
    assert_eq!(0.0, slow.score);

    let fast = &report.results[1];
    assert_eq!(Status::Ok, fast.status);
    assert_eq!(100.0, fast.score);

    assert_eq!(Verdict::Critical, report.verdict);
}

#[test]
fn errors_outrank_timeouts() {
    let transport = PathTransport::default().respond(
        "/slow",
        Ok(TransportResponse {
            status: 503,
            server_processing_time: None,
        }),
    );

    let definition = three_scenarios(sample_cli_cfg())
        .with_default_iterations(1)
        .build()
        .unwrap();
    let report = run_with(definition, &transport, Reporter::new(Vec::new())).unwrap();

    let statuses = report.results.iter().map(|r| r.status).collect::<Vec<_>>();
    assert_eq!(
        vec![Status::Error, Status::Timeout, Status::Timeout],
        statuses
    );
}

#[test]
fn empty_catalog_grades_zero() {
    let transport = PathTransport::default();

    let definition = BenchmarkDefinitionBuilder::new("empty", sample_cli_cfg())
        .build()
        .unwrap();
    let report = run_with(definition, &transport, Reporter::new(Vec::new())).unwrap();

    assert!(report.results.is_empty());
    assert_eq!(0.0, report.final_grade_pct);
    assert_eq!(Verdict::Critical, report.verdict);
    assert!(transport.requests.borrow().is_empty());
}

#[test]
fn invalid_configuration_fails_before_any_request() {
    let mut cli = sample_cli_cfg();
    cli.iterations = Some(0);

    let err = three_scenarios(cli).build().unwrap_err();

    assert_eq!(
        Some(&ConfigurationError::NonPositiveIterationCount),
        err.downcast_ref::<ConfigurationError>()
    );
}

#[test]
fn appends_run_summary() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");
    let summary_path = tempdir.path().join("runs.jsonl");

    let mut cli = sample_cli_cfg();
    cli.run_summary = Some(summary_path.clone());
    cli.run_id = Some("week-1".to_string());

    let transport = PathTransport::default()
        .processing_time("/slow", "0.001")
        .processing_time("/fast", "0.001")
        .processing_time("/middle", "0.001");
    let definition = three_scenarios(cli)
        .with_default_iterations(2)
        .build()
        .unwrap();
    let report = run_with(definition, &transport, Reporter::new(Vec::new())).unwrap();

    let runs = load_summary_runs(summary_path).unwrap();
    assert_eq!(1, runs.len());
    let run = &runs[0];
    assert_eq!("week-1", run.run_id);
    assert_eq!("pipeline", run.benchmark_name);
    assert_eq!("http://localhost:8000/", run.target_url);
    assert_eq!(2, run.iterations);
    assert_eq!(30_000, run.timeout_ms);
    assert_eq!("prefer-server-reported", run.timing_policy);
    assert_eq!(report, run.report);
}

#[test]
fn writes_json_report() {
    let tempdir = tempfile::tempdir().expect("failed to create temp dir");

    let mut cli = sample_cli_cfg();
    cli.reporter = vec![ReporterOpt::Json];
    cli.report_dir = tempdir.path().to_path_buf();

    let transport = PathTransport::default()
        .processing_time("/slow", "0.001")
        .processing_time("/fast", "0.001")
        .processing_time("/middle", "0.001");
    let definition = three_scenarios(cli)
        .with_default_iterations(1)
        .build()
        .unwrap();
    let reporter = definition.report_config().init();
    let report = run_with(definition, &transport, reporter).unwrap();

    let written = std::fs::read_dir(tempdir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert_eq!(1, written.len());

    let loaded: RunReport =
        serde_json::from_reader(std::fs::File::open(&written[0]).unwrap()).unwrap();
    assert_eq!(report, loaded);
    assert_eq!(Verdict::ProductionReady, loaded.verdict);
}
