use crate::error::ConfigurationError;
use crate::model::{Sample, Scenario, ScenarioResult, Status};

/// The score awarded to a scenario that meets its target.
pub const MAX_SCENARIO_SCORE: f64 = 100.0;

/// Multiple of the target latency at which a scenario scores nothing.
const ZERO_SCORE_FACTOR: f64 = 10.0;

/// Score an average latency against a target latency.
///
/// Full marks up to and including the target, zero from ten times the target onwards, and a
/// linear decay in between. The curve is continuous at both ends.
pub fn score_latency(average_latency_ms: f64, target_latency_ms: f64) -> f64 {
    if average_latency_ms <= target_latency_ms {
        return MAX_SCENARIO_SCORE;
    }

    let zero_at = target_latency_ms * ZERO_SCORE_FACTOR;
    if average_latency_ms >= zero_at {
        return 0.0;
    }

    let overhead = average_latency_ms - target_latency_ms;
    let max_overhead = zero_at - target_latency_ms;
    let points = MAX_SCENARIO_SCORE - (overhead / max_overhead) * MAX_SCENARIO_SCORE;

    points.clamp(0.0, MAX_SCENARIO_SCORE)
}

/// Reduce the samples recorded for a scenario into its result.
pub fn score(scenario: &Scenario, samples: &[Sample]) -> Result<ScenarioResult, ConfigurationError> {
    if samples.is_empty() {
        return Err(ConfigurationError::NoSamples {
            name: scenario.name().to_string(),
        });
    }

    let total_latency_ms = samples.iter().map(Sample::latency_ms).sum::<f64>();
    let average_latency_ms = total_latency_ms / samples.len() as f64;

    let status = samples
        .iter()
        .map(|sample| Status::from(sample.outcome()))
        .max()
        .unwrap_or(Status::Ok);

    let score = score_latency(average_latency_ms, scenario.target_latency_ms());

    log::debug!(
        "Scored [{}]: avg {:.2}ms against target {}ms, status {}, score {:.2}",
        scenario.name(),
        average_latency_ms,
        scenario.target_latency_ms(),
        status,
        score
    );

    Ok(ScenarioResult {
        scenario: scenario.clone(),
        average_latency_ms,
        status,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RequestSpec;

    fn scenario_with_target(target_latency_ms: f64) -> Scenario {
        Scenario::new("test", RequestSpec::get("/test"), target_latency_ms).unwrap()
    }

    #[test]
    fn full_score_at_or_below_target() {
        for target in [1.0, 10.0, 200.0] {
            assert_eq!(100.0, score_latency(0.0, target));
            assert_eq!(100.0, score_latency(target / 2.0, target));
            assert_eq!(100.0, score_latency(target, target));
        }
    }

    #[test]
    fn zero_score_from_ten_times_target() {
        for target in [1.0, 10.0, 200.0] {
            assert_eq!(0.0, score_latency(target * 10.0, target));
            assert_eq!(0.0, score_latency(target * 25.0, target));
            assert_eq!(0.0, score_latency(30_000.0, target));
        }
    }

    #[test]
    fn linear_between_boundaries() {
        assert_eq!(50.0, score_latency(55.0, 10.0));
        assert_eq!(50.0, score_latency(1100.0, 200.0));
        assert!((score_latency(5.5 * 20.0, 20.0) - 50.0).abs() < 1e-9);

        // A quarter of the way along the decay
        let target = 100.0;
        let avg = target + 0.25 * 9.0 * target;
        assert!((score_latency(avg, target) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn score_never_increases_with_latency() {
        let target = 50.0;
        let mut previous = score_latency(0.0, target);
        let mut avg = 0.0;
        while avg < target * 12.0 {
            let current = score_latency(avg, target);
            assert!(
                current <= previous,
                "score increased from {previous} to {current} at {avg}ms"
            );
            assert!((0.0..=100.0).contains(&current));
            previous = current;
            avg += 1.7;
        }
    }

    #[test]
    fn all_attempts_time_out() {
        let samples = vec![Sample::timeout(30_000.0); 5];

        let result = score(&scenario_with_target(10.0), &samples).unwrap();

        assert_eq!(30_000.0, result.average_latency_ms);
        assert_eq!(Status::Timeout, result.status);
        assert_eq!(0.0, result.score);
    }

    #[test]
    fn mean_of_successful_samples() {
        let samples = vec![
            Sample::success(10.0),
            Sample::success(20.0),
            Sample::success(30.0),
        ];

        let result = score(&scenario_with_target(20.0), &samples).unwrap();

        assert_eq!(20.0, result.average_latency_ms);
        assert_eq!(Status::Ok, result.status);
        assert_eq!(100.0, result.score);
    }

    #[test]
    fn penalty_samples_count_towards_average() {
        let samples = vec![
            Sample::success(10.0),
            Sample::success(10.0),
            Sample::error(100.0),
        ];

        let result = score(&scenario_with_target(10.0), &samples).unwrap();

        assert_eq!(40.0, result.average_latency_ms);
        assert_eq!(Status::Error, result.status);
        assert!((result.score - (100.0 - 30.0 / 90.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn error_outranks_timeout() {
        let samples = vec![
            Sample::timeout(1000.0),
            Sample::error(1000.0),
            Sample::success(1.0),
            Sample::timeout(1000.0),
        ];

        let result = score(&scenario_with_target(10.0), &samples).unwrap();

        assert_eq!(Status::Error, result.status);
    }

    #[test]
    fn timeout_outranks_ok() {
        let samples = vec![Sample::success(1.0), Sample::timeout(1000.0)];

        let result = score(&scenario_with_target(10.0), &samples).unwrap();

        assert_eq!(Status::Timeout, result.status);
    }

    #[test]
    fn no_samples_is_an_error() {
        let err = score(&scenario_with_target(10.0), &[]).unwrap_err();

        assert_eq!(
            ConfigurationError::NoSamples {
                name: "test".to_string()
            },
            err
        );
    }
}
