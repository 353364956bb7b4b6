use latency_grader_runner::prelude::*;

/// The logistics benchmark with its built-in catalog, one scenario per week of the optimization
/// course.
pub fn benchmark(cli: GraderCli) -> BenchmarkDefinitionBuilder {
    BenchmarkDefinitionBuilder::new(env!("CARGO_PKG_NAME"), cli)
        .with_default_iterations(5)
        .with_default_timeout_s(30)
        .add_scenario(
            "1. Unindexed Date Search",
            RequestSpec::get("/shipments/by-date").with_query("date", "2023-05"),
            10.0,
        )
        .add_scenario(
            "2. Driver Search",
            RequestSpec::get("/shipments/driver/John"),
            20.0,
        )
        .add_scenario(
            "3. JSON Parsing / Finance",
            RequestSpec::get("/finance/high-value-invoices"),
            200.0,
        )
        .add_scenario(
            "4. Partitioning / Telemetry",
            RequestSpec::get("/telemetry/truck/TRK-9821").with_query("limit", "100"),
            50.0,
        )
        .add_scenario(
            "5. Complex Aggregation",
            RequestSpec::get("/analytics/daily-stats"),
            100.0,
        )
}
