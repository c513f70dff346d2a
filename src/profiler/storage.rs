use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::{write::GzEncoder, Compression};
use tracing::{debug, trace, warn};

use super::measurement::CpuTimeMeasurement;
use super::sample::{sample_file_path, StorageSample, FILE_HEADER};
use super::Profiler;
use crate::options::ProfilerOptions;
use crate::primitives::clock::{system_clock, Clock};
use crate::types::{ProfilerError, Result, Stage};

type SampleStream = GzEncoder<BufWriter<File>>;

enum State {
    Unstarted,
    Started(SampleStream),
    Stopped,
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Unstarted => Stage::Unstarted,
            State::Started(_) => Stage::Started,
            State::Stopped => Stage::Stopped,
        }
    }
}

/// Records storage read and write samples to a gzip-compressed,
/// tab-separated file.
///
/// A session runs `start`, then any mix of [`start_timing`](Self::start_timing),
/// [`stop_timing`](Self::stop_timing) and [`sample`](Self::sample), then
/// `stop`. Mutating calls take `&mut self`; wrap the profiler in a
/// [`SharedStorageProfiler`](super::SharedStorageProfiler) to share it
/// between threads.
pub struct StorageProfiler {
    options: ProfilerOptions,
    measurements: HashMap<String, CpuTimeMeasurement>,
    state: State,
    start_time: Option<f64>,
    clock: Arc<dyn Clock>,
}

impl StorageProfiler {
    /// Creates a profiler writing `storage-<identifier>.csv.gz` into `output_dir`.
    ///
    /// An empty `output_dir` means the working directory.
    pub fn new(identifier: impl Into<String>, output_dir: impl AsRef<Path>) -> Self {
        let mut options = ProfilerOptions::new(identifier);
        let dir = output_dir.as_ref();
        if !dir.as_os_str().is_empty() {
            options = options.output_dir(dir);
        }
        Self::with_options(options)
    }

    /// Creates a profiler from options, using the system clock.
    pub fn with_options(options: ProfilerOptions) -> Self {
        Self {
            options,
            measurements: HashMap::new(),
            state: State::Unstarted,
            start_time: None,
            clock: system_clock(),
        }
    }

    /// Replaces the clock used for timing and sample timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Session identifier.
    pub fn identifier(&self) -> &str {
        &self.options.identifier
    }

    /// Path of the sample file this profiler writes.
    pub fn sample_path(&self) -> PathBuf {
        sample_file_path(&self.options.identifier, self.options.output_dir.as_deref())
    }

    /// Wall-clock seconds at which the sample file was opened.
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Returns true while the sample file is open.
    pub fn is_started(&self) -> bool {
        matches!(self.state, State::Started(_))
    }

    /// Measurement recorded for `profile_name`, if it was ever timed.
    pub fn measurement(&self, profile_name: &str) -> Option<&CpuTimeMeasurement> {
        self.measurements.get(profile_name)
    }

    /// Opens a timing window for `profile_name`, creating its measurement on
    /// first use. Any time accumulated in the previous window is discarded.
    pub fn start_timing(&mut self, profile_name: &str) {
        self.measurements
            .entry(profile_name.to_owned())
            .or_default()
            .sample_start(self.clock.as_ref());
        trace!(profile = profile_name, "profiler.storage.start_timing");
    }

    /// Adds the time since the last `start_timing` to `profile_name`'s total.
    ///
    /// Names that were never started are ignored.
    pub fn stop_timing(&mut self, profile_name: &str) {
        if let Some(measurement) = self.measurements.get_mut(profile_name) {
            measurement.sample_stop(self.clock.as_ref());
            trace!(
                profile = profile_name,
                total_secs = measurement.total_cpu_seconds(),
                "profiler.storage.stop_timing"
            );
        }
    }

    /// Appends one sample row.
    ///
    /// A timed profile contributes its window start time and accumulated
    /// total; an untimed one is stamped with the current wall time and zero
    /// processing time. The measurement itself is left untouched.
    pub fn sample(
        &mut self,
        profile_name: &str,
        operation: &str,
        description: &str,
        data_size: u64,
        compressed_data_size: u64,
    ) -> Result<()> {
        let (time, processing_time) = match self
            .measurements
            .get(profile_name)
            .and_then(|m| m.start_sample_time().map(|t| (t, m.total_cpu_seconds())))
        {
            Some(timed) => timed,
            None => (self.clock.wall_seconds(), 0.0),
        };
        let stream = match &mut self.state {
            State::Started(stream) => stream,
            other => return Err(ProfilerError::invalid_state("sample", other.stage())),
        };
        StorageSample {
            time,
            name: profile_name,
            operation,
            description,
            processing_time,
            data_size,
            compressed_data_size,
        }
        .write_to(stream)?;
        trace!(
            profile = profile_name,
            operation,
            data_size,
            compressed_data_size,
            "profiler.storage.sample"
        );
        Ok(())
    }

    fn open_stream(&self, path: &Path) -> Result<SampleStream> {
        let file = File::create(path)?;
        let level = Compression::new(self.options.compression_level);
        let mut stream = GzEncoder::new(BufWriter::new(file), level);
        stream.write_all(FILE_HEADER.as_bytes())?;
        Ok(stream)
    }
}

impl Profiler for StorageProfiler {
    fn is_supported() -> bool {
        true
    }

    /// Creates the sample file and writes the header row.
    fn start(&mut self) -> Result<()> {
        if !matches!(self.state, State::Unstarted) {
            return Err(ProfilerError::invalid_state("start", self.state.stage()));
        }
        self.options.validate()?;
        let path = self.sample_path();
        let stream = self.open_stream(&path)?;
        self.state = State::Started(stream);
        self.start_time = Some(self.clock.wall_seconds());
        debug!(
            identifier = self.identifier(),
            path = %path.display(),
            level = self.options.compression_level,
            "profiler.storage.started"
        );
        Ok(())
    }

    /// Finishes the gzip stream and closes the sample file.
    fn stop(&mut self) -> Result<()> {
        let stream = match std::mem::replace(&mut self.state, State::Stopped) {
            State::Started(stream) => stream,
            other => {
                let stage = other.stage();
                self.state = other;
                return Err(ProfilerError::invalid_state("stop", stage));
            }
        };
        let mut writer = stream.finish()?;
        writer.flush()?;
        debug!(
            profiles = self.measurements.len(),
            "profiler.storage.stopped"
        );
        Ok(())
    }
}

impl Drop for StorageProfiler {
    fn drop(&mut self) {
        if let State::Started(stream) = std::mem::replace(&mut self.state, State::Stopped) {
            warn!(
                path = %self.sample_path().display(),
                "profiler.storage.dropped_while_started"
            );
            if let Err(err) = stream.finish().and_then(|mut writer| writer.flush()) {
                warn!(error = %err, "profiler.storage.drop_finish_failed");
            }
        }
    }
}
