#![allow(missing_docs)]

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::thread;

use flate2::read::GzDecoder;
use storprof::{profiler::FIELD_COUNT, ProfilerError, SharedStorageProfiler, StorageProfiler};
use tempfile::TempDir;

#[test]
fn concurrent_writers_never_interleave_rows() {
    let dir = TempDir::new().expect("tempdir");
    let shared = SharedStorageProfiler::new(StorageProfiler::new("threads", dir.path()));
    assert!(SharedStorageProfiler::is_supported());
    shared.start().expect("start");

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let profiler = shared.clone();
            thread::spawn(move || {
                let name = format!("worker{worker}");
                for chunk in 0..50u64 {
                    profiler.start_timing(&name);
                    profiler.stop_timing(&name);
                    profiler
                        .sample(&name, "write", &format!("chunk{chunk}"), chunk, chunk / 2)
                        .expect("sample");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }
    assert!(shared.total_cpu_seconds("worker0").is_some());
    assert!(shared.total_cpu_seconds("nobody").is_none());
    shared.stop().expect("stop");
    assert!(!shared.is_started());

    let mut text = String::new();
    GzDecoder::new(File::open(shared.sample_path()).expect("open"))
        .read_to_string(&mut text)
        .expect("decompress");
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 200);
    let mut seen = HashSet::new();
    for row in rows {
        let fields: Vec<&str> = row.split('\t').collect();
        assert_eq!(fields.len(), FIELD_COUNT, "{row}");
        assert!(seen.insert((fields[1].to_owned(), fields[3].to_owned())));
    }
}

#[test]
fn shared_handle_reports_lifecycle_errors() {
    let dir = TempDir::new().expect("tempdir");
    let shared: SharedStorageProfiler = StorageProfiler::new("shared", dir.path()).into();
    let err = shared.sample("a", "read", "", 0, 0).unwrap_err();
    assert!(matches!(err, ProfilerError::InvalidState { .. }));
    shared.start().expect("start");
    assert!(shared.is_started());
    shared.stop().expect("stop");
}
