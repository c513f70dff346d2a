#![allow(missing_docs)]

// The switch is read once per process, so this binary holds a single test
// that sets the variable before anything consults it.

use storprof::{
    options::PROFILE_ENV_VAR,
    profiler::storage_profiler_if_enabled,
    profiling_enabled, ProfilerOptions,
};

#[test]
fn env_var_enables_storage_profiler() {
    std::env::set_var(PROFILE_ENV_VAR, "1");
    assert!(profiling_enabled());

    let profiler = storage_profiler_if_enabled(ProfilerOptions::new("env-on").output_dir("out"))
        .expect("profiler enabled by env var");
    assert_eq!(profiler.identifier(), "env-on");
    assert!(!profiler.is_started());

    std::env::remove_var(PROFILE_ENV_VAR);
    assert!(profiling_enabled());
}
