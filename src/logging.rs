//! Log subscriber setup for binaries embedding the profiler.

use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{ProfilerError, Result};

/// Installs a global `fmt` subscriber filtered by `level`.
///
/// `level` accepts any `EnvFilter` directive, e.g. `info` or
/// `storprof=debug`. Fails if the directive is invalid or a global subscriber
/// is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| ProfilerError::InvalidArgument(format!("invalid log level: {e}")))?,
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| ProfilerError::Logging("subscriber already installed".into()))
}
