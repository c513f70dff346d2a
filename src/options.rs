//! Profiler configuration and the environment switch that enables profiling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::types::{ProfilerError, Result};

/// Environment variable that switches storage profiling on.
pub const PROFILE_ENV_VAR: &str = "STORPROF_PROFILE";

/// Gzip level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

static PROFILE_ENABLED: OnceLock<bool> = OnceLock::new();

/// Returns true when [`PROFILE_ENV_VAR`] was set the first time this was called.
pub fn profiling_enabled() -> bool {
    *PROFILE_ENABLED.get_or_init(|| std::env::var_os(PROFILE_ENV_VAR).is_some())
}

/// Configuration for a [`StorageProfiler`](crate::profiler::StorageProfiler).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilerOptions {
    /// Identifier of the profiling session, embedded in the sample file name.
    pub identifier: String,
    /// Directory that receives the sample file; the working directory if unset.
    pub output_dir: Option<PathBuf>,
    /// Gzip compression level, 0 through 9.
    pub compression_level: u32,
}

impl Default for ProfilerOptions {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            output_dir: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ProfilerOptions {
    /// Creates options for the given session identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the gzip compression level.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Parses options from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| ProfilerError::Config(err.to_string()))
    }

    /// Reads and parses a TOML options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Checks the identifier and compression level.
    ///
    /// The identifier becomes part of a file name, so it must be non-empty and
    /// free of path separators.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.is_empty() {
            return Err(ProfilerError::InvalidArgument(
                "identifier must not be empty".into(),
            ));
        }
        if self
            .identifier
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0')
        {
            return Err(ProfilerError::InvalidArgument(format!(
                "identifier {:?} contains a path separator",
                self.identifier
            )));
        }
        if self.compression_level > 9 {
            return Err(ProfilerError::InvalidArgument(format!(
                "compression level {} is above 9",
                self.compression_level
            )));
        }
        Ok(())
    }
}
