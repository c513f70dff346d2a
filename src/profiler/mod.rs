//! Storage sampling profilers.
//!
//! [`StorageProfiler`] writes one row per storage read or write to a
//! gzip-compressed, tab-separated file. Each row pairs caller-supplied sizes
//! with the timing window recorded for its profile name by
//! [`CpuTimeMeasurement`].

mod measurement;
mod sample;
mod shared;
mod storage;

pub use measurement::CpuTimeMeasurement;
pub use sample::{
    sample_file_path, StorageSample, FIELD_COUNT, FILENAME_PREFIX, FILENAME_SUFFIX, FILE_HEADER,
};
pub use shared::SharedStorageProfiler;
pub use storage::StorageProfiler;

use crate::options::{profiling_enabled, ProfilerOptions};
use crate::types::Result;

/// Returns a storage profiler when profiling is switched on through
/// [`PROFILE_ENV_VAR`](crate::options::PROFILE_ENV_VAR), `None` otherwise.
pub fn storage_profiler_if_enabled(options: ProfilerOptions) -> Option<StorageProfiler> {
    profiling_enabled().then(|| StorageProfiler::with_options(options))
}

/// Lifecycle shared by profiler kinds.
pub trait Profiler {
    /// Whether this kind of profiler can run on the current platform.
    fn is_supported() -> bool
    where
        Self: Sized;

    /// Begins a profiling session.
    fn start(&mut self) -> Result<()>;

    /// Ends the profiling session, flushing any output.
    fn stop(&mut self) -> Result<()>;
}

/// A profiler that records nothing.
///
/// Used in place of a real profiler when profiling is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfiler;

impl Profiler for NoopProfiler {
    fn is_supported() -> bool {
        true
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}
