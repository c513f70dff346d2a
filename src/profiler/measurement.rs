use std::time::Duration;

use crate::primitives::clock::Clock;

/// Processing time accumulated for one profile name.
///
/// Durations come from the clock's monotonic reading. The wall-clock time of
/// the most recent [`sample_start`](Self::sample_start) is kept alongside so
/// samples can say when their window began.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuTimeMeasurement {
    start_monotonic: Option<Duration>,
    start_sample_time: Option<f64>,
    total_cpu_time: Option<Duration>,
}

impl CpuTimeMeasurement {
    /// Creates a measurement that has never been started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new window: records both clock readings and zeroes the total.
    ///
    /// Time accumulated since the previous start is discarded.
    pub fn sample_start(&mut self, clock: &dyn Clock) {
        self.start_monotonic = Some(clock.monotonic());
        self.start_sample_time = Some(clock.wall_seconds());
        self.total_cpu_time = Some(Duration::ZERO);
    }

    /// Adds the time elapsed since the most recent start to the total.
    ///
    /// Does nothing if the measurement was never started.
    pub fn sample_stop(&mut self, clock: &dyn Clock) {
        let Some(start) = self.start_monotonic else {
            return;
        };
        let elapsed = clock.monotonic().saturating_sub(start);
        let total = self.total_cpu_time.get_or_insert(Duration::ZERO);
        *total = total.saturating_add(elapsed);
    }

    /// Wall-clock seconds at the most recent start, if any.
    pub fn start_sample_time(&self) -> Option<f64> {
        self.start_sample_time
    }

    /// Accumulated time in the current window, if started.
    pub fn total_cpu_time(&self) -> Option<Duration> {
        self.total_cpu_time
    }

    /// Accumulated time in seconds; zero before the first start.
    pub fn total_cpu_seconds(&self) -> f64 {
        self.total_cpu_time
            .map(|total| total.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Returns true once [`sample_start`](Self::sample_start) has been called.
    pub fn is_started(&self) -> bool {
        self.start_monotonic.is_some()
    }
}
