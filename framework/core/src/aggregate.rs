use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::{RunReport, ScenarioResult};
use crate::score::MAX_SCENARIO_SCORE;

/// Grade at or above which a run is no longer critical.
const SLOW_THRESHOLD_PCT: f64 = 50.0;
/// Grade at or above which a run is considered ready for production.
const PRODUCTION_READY_THRESHOLD_PCT: f64 = 90.0;

/// Quality tier for a run, derived from the final grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Critical,
    Slow,
    #[serde(rename = "Production-Ready")]
    ProductionReady,
}

impl Verdict {
    /// Each tier is inclusive of its lower bound.
    pub fn from_grade(final_grade_pct: f64) -> Self {
        if final_grade_pct >= PRODUCTION_READY_THRESHOLD_PCT {
            Verdict::ProductionReady
        } else if final_grade_pct >= SLOW_THRESHOLD_PCT {
            Verdict::Slow
        } else {
            Verdict::Critical
        }
    }

    /// The line shown to the operator once the run is complete.
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Critical => "SYSTEM CRITICAL. DO NOT DEPLOY.",
            Verdict::Slow => "FUNCTIONAL BUT SLOW. NEEDS OPTIMIZATION.",
            Verdict::ProductionReady => "HIGH PERFORMANCE. READY FOR PRODUCTION.",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verdict::Critical => "Critical",
            Verdict::Slow => "Slow",
            Verdict::ProductionReady => "Production-Ready",
        })
    }
}

/// Combine the per-scenario results of a run into its report.
///
/// An empty run has a grade of zero.
pub fn aggregate(results: Vec<ScenarioResult>) -> RunReport {
    let total_score = results.iter().map(|r| r.score).sum::<f64>();
    let max_score = MAX_SCENARIO_SCORE * results.len() as f64;

    let final_grade_pct = if results.is_empty() {
        0.0
    } else {
        (total_score / max_score * 100.0).clamp(0.0, 100.0)
    };

    RunReport {
        results,
        total_score,
        max_score,
        final_grade_pct,
        verdict: Verdict::from_grade(final_grade_pct),
    }
}
