use std::fmt::Debug;
use std::time::{Duration, Instant};

mod report;

pub use report::{
    JsonReportCollector, ReportCollector, ReportConfig, Reporter, RunHeader,
    SummaryReportCollector,
};

/// Wall-clock timing of a single operation against the target system.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    operation_id: String,
    started: Instant,
    elapsed: Option<Duration>,
}

impl OperationRecord {
    /// Start timing an operation. The clock starts immediately.
    pub fn new(operation_id: String) -> Self {
        Self {
            operation_id,
            started: Instant::now(),
            elapsed: None,
        }
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Stop the clock. Calling this more than once keeps the first measurement.
    pub fn finish(&mut self) -> Duration {
        *self.elapsed.get_or_insert_with(|| self.started.elapsed())
    }

    /// The measured duration, if the operation has finished.
    pub fn duration(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// Convert a duration to fractional milliseconds.
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Log the timing and result of a finished operation.
pub fn report_operation<T, E: Debug>(operation_record: &OperationRecord, response: &Result<T, E>) {
    let duration = operation_record.duration().unwrap_or_default();
    match response {
        Ok(_) => log::trace!(
            "Operation {} took {:.3}ms",
            operation_record.operation_id,
            duration_ms(duration),
        ),
        Err(e) => log::trace!(
            "Operation {} failed after {:.3}ms: {:?}",
            operation_record.operation_id,
            duration_ms(duration),
            e,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_keeps_first_measurement() {
        let mut record = OperationRecord::new("op".to_string());
        assert!(record.duration().is_none());

        let first = record.finish();
        std::thread::sleep(Duration::from_millis(2));
        let second = record.finish();

        assert_eq!(first, second);
        assert_eq!(Some(first), record.duration());
        assert_eq!("op", record.operation_id());
    }

    #[test]
    fn measures_elapsed_time() {
        let mut record = OperationRecord::new("sleep".to_string());
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = record.finish();

        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn converts_to_fractional_millis() {
        assert_eq!(1.5, duration_ms(Duration::from_micros(1500)));
        assert_eq!(30_000.0, duration_ms(Duration::from_secs(30)));
    }
}
