use indicatif::{ProgressBar, ProgressStyle};
use latency_grader_core::prelude::Outcome;

/// Shows how many attempts have been made for the scenario currently being sampled.
///
/// Each attempt advances the bar by one and appends its outcome marker (`.`, `T` or `E`) to the
/// message. Purely informational.
pub struct AttemptProgress {
    bar: ProgressBar,
    markers: String,
}

impl AttemptProgress {
    pub fn start(scenario_name: &str, iterations: usize) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(iterations as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} {prefix:40} [{bar:20.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
        );
        bar.set_prefix(scenario_name.to_string());

        Ok(Self {
            bar,
            markers: String::new(),
        })
    }

    /// A progress indicator that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            markers: String::new(),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.markers.push(outcome.marker());
        self.bar.set_message(self.markers.clone());
        self.bar.inc(1);
    }

    /// Markers for the attempts recorded so far, in attempt order.
    pub fn markers(&self) -> &str {
        &self.markers
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_markers_in_order() {
        let mut progress = AttemptProgress::hidden();
        progress.record(Outcome::Success);
        progress.record(Outcome::Timeout);
        progress.record(Outcome::Error);
        progress.record(Outcome::Success);

        assert_eq!(".TE.", progress.markers());
        progress.finish();
    }

    #[test]
    fn start_with_huge_iteration_count() {
        let mut progress = AttemptProgress::start("huge", usize::MAX).unwrap();
        progress.record(Outcome::Success);

        assert_eq!(".", progress.markers());
        progress.finish();
    }
}
