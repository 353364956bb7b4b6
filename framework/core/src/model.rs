use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::aggregate::Verdict;
use crate::error::ConfigurationError;

/// HTTP method used to issue a scenario's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes the request a scenario sends to the target system.
///
/// The engine never interprets the request beyond handing it to a transport. The `path` is relative
/// to the configured target address and may already contain a query string, any pairs in `query`
/// are appended after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl Display for RequestSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        let mut separator = if self.path.contains('?') { '&' } else { '?' };
        for (key, value) in &self.query {
            write!(f, "{separator}{key}={value}")?;
            separator = '&';
        }
        Ok(())
    }
}

/// A named test case pairing a request with the latency it is expected to meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    request: RequestSpec,
    target_latency_ms: f64,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        request: RequestSpec,
        target_latency_ms: f64,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyScenarioName);
        }
        // Also rejects NaN.
        if !(target_latency_ms.is_finite() && target_latency_ms > 0.0) {
            return Err(ConfigurationError::NonPositiveTargetLatency {
                name,
                target_latency_ms,
            });
        }
        if !request.path.starts_with('/') {
            return Err(ConfigurationError::InvalidRequestPath {
                name,
                path: request.path,
            });
        }

        Ok(Self {
            name,
            request,
            target_latency_ms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    pub fn target_latency_ms(&self) -> f64 {
        self.target_latency_ms
    }
}

/// The ordered, read-only list of scenarios for a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::with_capacity(scenarios.len());
        for scenario in &scenarios {
            if !seen.insert(scenario.name()) {
                return Err(ConfigurationError::DuplicateScenarioName {
                    name: scenario.name().to_string(),
                });
            }
        }

        Ok(Self { scenarios })
    }

    /// Look up a scenario by its name.
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Classification of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Timeout,
    Error,
}

impl Outcome {
    /// Single character marker used to show attempt progress.
    pub fn marker(&self) -> char {
        match self {
            Outcome::Success => '.',
            Outcome::Timeout => 'T',
            Outcome::Error => 'E',
        }
    }
}

/// One measured attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    latency_ms: f64,
    outcome: Outcome,
}

impl Sample {
    pub fn new(latency_ms: f64, outcome: Outcome) -> Self {
        Self {
            latency_ms: latency_ms.max(0.0),
            outcome,
        }
    }

    pub fn success(latency_ms: f64) -> Self {
        Self::new(latency_ms, Outcome::Success)
    }

    pub fn timeout(penalty_ms: f64) -> Self {
        Self::new(penalty_ms, Outcome::Timeout)
    }

    pub fn error(penalty_ms: f64) -> Self {
        Self::new(penalty_ms, Outcome::Error)
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

/// The worst outcome observed for a scenario.
///
/// Variants are declared in increasing severity so that `Ord` gives the reporting precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "TIMEOUT")]
    Timeout,
    #[serde(rename = "ERROR")]
    Error,
}

impl From<Outcome> for Status {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Status::Ok,
            Outcome::Timeout => Status::Timeout,
            Outcome::Error => Status::Error,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Timeout => "TIMEOUT",
            Status::Error => "ERROR",
        })
    }
}

/// Result of scoring one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    /// Mean latency over every sample, including penalty valued failures.
    pub average_latency_ms: f64,
    pub status: Status,
    /// Score in the range 0 to 100.
    pub score: f64,
}

/// Aggregate of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per scenario, in catalog order.
    pub results: Vec<ScenarioResult>,
    pub total_score: f64,
    pub max_score: f64,
    pub final_grade_pct: f64,
    pub verdict: Verdict,
}
