use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Profiler, StorageProfiler};
use crate::types::Result;

/// Cloneable, thread-safe handle to a [`StorageProfiler`].
///
/// Every call holds the lock for exactly one operation, so rows written from
/// different threads never interleave.
#[derive(Clone)]
pub struct SharedStorageProfiler {
    inner: Arc<Mutex<StorageProfiler>>,
}

impl SharedStorageProfiler {
    /// Wraps a profiler.
    pub fn new(profiler: StorageProfiler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(profiler)),
        }
    }

    /// Always true; see [`Profiler::is_supported`].
    pub fn is_supported() -> bool {
        StorageProfiler::is_supported()
    }

    /// See [`Profiler::start`].
    pub fn start(&self) -> Result<()> {
        self.inner.lock().start()
    }

    /// See [`Profiler::stop`].
    pub fn stop(&self) -> Result<()> {
        self.inner.lock().stop()
    }

    /// See [`StorageProfiler::start_timing`].
    pub fn start_timing(&self, profile_name: &str) {
        self.inner.lock().start_timing(profile_name);
    }

    /// See [`StorageProfiler::stop_timing`].
    pub fn stop_timing(&self, profile_name: &str) {
        self.inner.lock().stop_timing(profile_name);
    }

    /// See [`StorageProfiler::sample`].
    pub fn sample(
        &self,
        profile_name: &str,
        operation: &str,
        description: &str,
        data_size: u64,
        compressed_data_size: u64,
    ) -> Result<()> {
        self.inner.lock().sample(
            profile_name,
            operation,
            description,
            data_size,
            compressed_data_size,
        )
    }

    /// Path of the sample file.
    pub fn sample_path(&self) -> PathBuf {
        self.inner.lock().sample_path()
    }

    /// Returns true while the sample file is open.
    pub fn is_started(&self) -> bool {
        self.inner.lock().is_started()
    }

    /// Accumulated seconds for `profile_name`, if it was ever timed.
    pub fn total_cpu_seconds(&self, profile_name: &str) -> Option<f64> {
        self.inner
            .lock()
            .measurement(profile_name)
            .map(|m| m.total_cpu_seconds())
    }
}

impl From<StorageProfiler> for SharedStorageProfiler {
    fn from(profiler: StorageProfiler) -> Self {
        Self::new(profiler)
    }
}
