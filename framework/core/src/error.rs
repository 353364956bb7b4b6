/// Returned when a benchmark is configured in a way that cannot produce a meaningful run.
///
/// These errors are fatal and are raised before any request is sent to the target system. Failures
/// of individual requests are never reported through this type, they are recorded as samples.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[display("scenario name must not be empty")]
    EmptyScenarioName,
    #[display("scenario [{name}] is defined more than once")]
    DuplicateScenarioName { name: String },
    #[display("scenario [{name}] has target latency {target_latency_ms}ms, it must be positive")]
    NonPositiveTargetLatency { name: String, target_latency_ms: f64 },
    #[display("scenario [{name}] has request path [{path}], it must start with '/'")]
    InvalidRequestPath { name: String, path: String },
    #[display("iteration count must be at least 1")]
    NonPositiveIterationCount,
    #[display("request timeout must be greater than zero")]
    NonPositiveTimeout,
    #[display("request timeout of {timeout_s}s is not a usable duration")]
    TimeoutOutOfRange { timeout_s: f64 },
    #[display("invalid target url [{url}]: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[display("no samples were recorded for scenario [{name}]")]
    NoSamples { name: String },
}
