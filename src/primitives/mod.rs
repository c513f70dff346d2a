//! Low-level primitives shared by the profilers.

/// Clock sources.
///
/// Monotonic and wall-clock readings behind one injectable trait.
pub mod clock;
