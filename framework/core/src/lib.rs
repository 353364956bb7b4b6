mod aggregate;
mod error;
mod model;
mod score;

pub mod prelude {
    pub use crate::aggregate::{aggregate, Verdict};
    pub use crate::error::ConfigurationError;
    pub use crate::model::{
        HttpMethod, Outcome, RequestSpec, RunReport, Sample, Scenario, ScenarioCatalog,
        ScenarioResult, Status,
    };
    pub use crate::score::{score, score_latency, MAX_SCENARIO_SCORE};
}
