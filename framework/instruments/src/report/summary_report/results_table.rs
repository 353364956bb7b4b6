use latency_grader_core::prelude::ScenarioResult;
use tabled::Tabled;

#[derive(Tabled)]
pub struct ScenarioRow {
    #[tabled(rename = "TEST CASE")]
    pub name: String,
    #[tabled(rename = "AVG TIME (ms)")]
    #[tabled(display = "float2")]
    pub avg_time_ms: f64,
    #[tabled(rename = "STATUS")]
    pub status: String,
    #[tabled(rename = "SCORE")]
    pub score: String,
}

impl From<&ScenarioResult> for ScenarioRow {
    fn from(result: &ScenarioResult) -> Self {
        Self {
            name: result.scenario.name().to_string(),
            avg_time_ms: result.average_latency_ms,
            status: result.status.to_string(),
            // Whole points only, partial points are not shown
            score: format!("{}/100", result.score.trunc() as u32),
        }
    }
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}
