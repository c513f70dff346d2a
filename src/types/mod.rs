//! Shared error and result types.

use thiserror::Error;

/// Lifecycle stage of a profiler, reported in [`ProfilerError::InvalidState`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// `start` has not been called yet.
    Unstarted,
    /// The sample stream is open.
    Started,
    /// The sample stream was closed by `stop`.
    Stopped,
}

impl Stage {
    /// Lowercase name used in error messages and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Unstarted => "unstarted",
            Stage::Started => "started",
            Stage::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for profiler operations.
#[derive(Debug, Error)]
pub enum ProfilerError {
    /// Opening, writing or finishing the sample file failed.
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    /// An operation was called in a lifecycle stage that does not permit it.
    #[error("cannot {op} a {state} profiler")]
    InvalidState {
        /// Operation that was attempted.
        op: &'static str,
        /// Stage the profiler was in.
        state: Stage,
    },
    /// A caller-supplied value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The global log subscriber could not be installed.
    #[error("logging: {0}")]
    Logging(String),
    /// An options file could not be parsed.
    #[error("config: {0}")]
    Config(String),
}

/// Result type alias for profiler operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;

impl ProfilerError {
    pub(crate) fn invalid_state(op: &'static str, state: Stage) -> Self {
        ProfilerError::InvalidState { op, state }
    }
}
