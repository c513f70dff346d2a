#![forbid(unsafe_code)]

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant, SystemTime},
};

/// Source of the two time readings a profiler needs.
///
/// `monotonic` measures durations and never goes backwards; its origin is
/// arbitrary. `wall_seconds` reports "when" something happened as seconds
/// since the Unix epoch and may jump if the system clock is adjusted.
pub trait Clock: Send + Sync + 'static {
    /// Current monotonic reading, relative to a clock-specific origin.
    fn monotonic(&self) -> Duration;
    /// Current wall-clock time in seconds since the Unix epoch.
    fn wall_seconds(&self) -> f64;
}

/// Clock backed by [`Instant`] and [`SystemTime`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a system clock whose monotonic origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall_seconds(&self) -> f64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Returns the default clock wrapped in an [`Arc`].
pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock::new())
}

/// Clock that only moves when told to.
///
/// Clones share the same readings, so a test can keep one handle and give
/// another to the profiler under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<ManualClockInner>,
}

#[derive(Debug, Default)]
struct ManualClockInner {
    monotonic_ns: AtomicU64,
    wall_us: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at monotonic zero and the given wall time.
    pub fn new(wall_seconds: f64) -> Self {
        let clock = Self::default();
        clock.set_wall_seconds(wall_seconds);
        clock
    }

    /// Advances both readings by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = by.as_nanos().min(u64::MAX as u128) as u64;
        self.inner.monotonic_ns.fetch_add(nanos, Ordering::SeqCst);
        self.inner
            .wall_us
            .fetch_add(nanos / 1_000, Ordering::SeqCst);
    }

    /// Moves only the wall clock, as a system time adjustment would.
    pub fn set_wall_seconds(&self, wall_seconds: f64) {
        let micros = (wall_seconds.max(0.0) * 1_000_000.0).round() as u64;
        self.inner.wall_us.store(micros, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        Duration::from_nanos(self.inner.monotonic_ns.load(Ordering::SeqCst))
    }

    fn wall_seconds(&self) -> f64 {
        self.inner.wall_us.load(Ordering::SeqCst) as f64 / 1_000_000.0
    }
}
