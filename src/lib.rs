//! Storage I/O sampling profiler.
//!
//! Records per-operation read/write timing and data sizes into a
//! gzip-compressed, tab-separated sample file for offline analysis.

#![warn(missing_docs)]

pub mod logging;
pub mod options;
pub mod primitives;
pub mod profiler;
pub mod types;

pub use options::{profiling_enabled, ProfilerOptions};
pub use primitives::clock::{Clock, ManualClock, SystemClock};
pub use profiler::{
    CpuTimeMeasurement, NoopProfiler, Profiler, SharedStorageProfiler, StorageProfiler,
};
pub use types::{ProfilerError, Result, Stage};
