use std::fmt::{Display, Formatter};
use std::time::Duration;

use clap::ValueEnum;
use latency_grader_core::prelude::{ConfigurationError, Sample, Scenario};
use latency_grader_instruments::{duration_ms, report_operation, OperationRecord};

use crate::progress::AttemptProgress;
use crate::transport::{Transport, TransportError, TransportResponse};

/// Chooses which latency an attempt is recorded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimingPolicy {
    /// Use the processing time reported by the target when present, otherwise the round trip.
    #[default]
    PreferServerReported,
    /// Always use the round trip time measured by the sampler.
    WallClock,
}

impl Display for TimingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TimingPolicy::PreferServerReported => "prefer-server-reported",
            TimingPolicy::WallClock => "wall-clock",
        })
    }
}

/// Issues a scenario's request repeatedly and records one [Sample] per attempt.
///
/// Attempts run one after another, never concurrently, so that the target does not see queued
/// requests from the sampler itself. An attempt that times out or fails is recorded with the
/// timeout as its latency and never retried.
pub struct Sampler<T: Transport> {
    transport: T,
    timing_policy: TimingPolicy,
}

impl<T: Transport> Sampler<T> {
    pub fn new(transport: T, timing_policy: TimingPolicy) -> Self {
        Self {
            transport,
            timing_policy,
        }
    }

    pub fn timing_policy(&self) -> TimingPolicy {
        self.timing_policy
    }

    /// Take exactly `iteration_count` samples of `scenario`, in attempt order.
    ///
    /// Only an invalid iteration count or timeout is an error. Request failures become samples.
    pub fn sample(
        &self,
        scenario: &Scenario,
        iteration_count: usize,
        timeout: Duration,
        progress: &mut AttemptProgress,
    ) -> Result<Vec<Sample>, ConfigurationError> {
        if iteration_count == 0 {
            return Err(ConfigurationError::NonPositiveIterationCount);
        }
        if timeout.is_zero() {
            return Err(ConfigurationError::NonPositiveTimeout);
        }

        let mut samples = Vec::new();
        for attempt in 0..iteration_count {
            let sample = self.attempt(scenario, attempt, timeout);
            progress.record(sample.outcome());
            samples.push(sample);
        }

        Ok(samples)
    }

    fn attempt(&self, scenario: &Scenario, attempt: usize, timeout: Duration) -> Sample {
        let penalty_ms = duration_ms(timeout);

        let mut record = OperationRecord::new(format!("{}#{}", scenario.name(), attempt));
        let response = self.transport.execute(scenario.request(), timeout);
        let wall_clock = record.finish();
        report_operation(&record, &response);

        match response {
            Ok(response) if !response.is_success() => {
                log::debug!(
                    "[{}] attempt {} returned status {}",
                    scenario.name(),
                    attempt,
                    response.status
                );
                Sample::error(penalty_ms)
            }
            Ok(response) => match self.latency_ms(&response, wall_clock) {
                Ok(latency_ms) => Sample::success(latency_ms),
                Err(reason) => {
                    log::debug!(
                        "[{}] attempt {} had a malformed response: {}",
                        scenario.name(),
                        attempt,
                        reason
                    );
                    Sample::error(penalty_ms)
                }
            },
            Err(e @ TransportError::Timeout { .. }) => {
                log::debug!("[{}] attempt {}: {}", scenario.name(), attempt, e);
                Sample::timeout(penalty_ms)
            }
            Err(e @ TransportError::Failed { .. }) => {
                log::debug!("[{}] attempt {}: {}", scenario.name(), attempt, e);
                Sample::error(penalty_ms)
            }
        }
    }

    fn latency_ms(&self, response: &TransportResponse, wall_clock: Duration) -> Result<f64, String> {
        match (self.timing_policy, response.server_processing_time.as_deref()) {
            (TimingPolicy::PreferServerReported, Some(raw)) => parse_processing_time_ms(raw),
            _ => Ok(duration_ms(wall_clock)),
        }
    }
}

/// The processing time header carries fractional seconds.
fn parse_processing_time_ms(raw: &str) -> Result<f64, String> {
    let seconds = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("processing time [{raw}] is not a number: {e}"))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("processing time [{raw}] is out of range"));
    }

    Ok(seconds * 1000.0)
}
