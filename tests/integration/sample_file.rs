#![allow(missing_docs)]

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use flate2::read::GzDecoder;
use storprof::{
    profiler::{FIELD_COUNT, FILE_HEADER},
    ManualClock, Profiler, ProfilerError, ProfilerOptions, StorageProfiler,
};
use tempfile::TempDir;

fn read_sample_file(path: &Path) -> String {
    let mut text = String::new();
    GzDecoder::new(File::open(path).expect("open sample file"))
        .read_to_string(&mut text)
        .expect("decompress sample file");
    text
}

fn fields(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs_f64()
}

#[test]
fn round_trip_yields_header_plus_one_line_per_sample() {
    let dir = TempDir::new().expect("tempdir");
    let mut profiler = StorageProfiler::new("roundtrip", dir.path());
    profiler.start().expect("start");
    for i in 0..25u64 {
        let name = format!("stream{}", i % 3);
        if i % 2 == 0 {
            profiler.start_timing(&name);
            profiler.stop_timing(&name);
        }
        let op = if i % 4 == 0 { "read" } else { "write" };
        profiler
            .sample(&name, op, &format!("chunk{i}"), i * 100, i * 40)
            .expect("sample");
    }
    profiler.stop().expect("stop");

    let path = dir.path().join("storage-roundtrip.csv.gz");
    assert_eq!(profiler.sample_path(), path);
    let text = read_sample_file(&path);
    assert!(text.starts_with(FILE_HEADER));
    assert!(text.ends_with('\n'));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 26);
    for line in &lines {
        assert_eq!(fields(line).len(), FIELD_COUNT, "{line}");
    }
    let last = fields(lines[25]);
    assert_eq!(last[1], "stream0");
    assert_eq!(last[2], "read");
    assert_eq!(last[3], "chunk24");
    assert_eq!(last[5], "2400");
    assert_eq!(last[6], "960");
}

#[test]
fn timed_chunk_records_processing_time() {
    let dir = TempDir::new().expect("tempdir");
    let mut profiler = StorageProfiler::new("scenario", dir.path());
    profiler.start().expect("start");
    let before = now_seconds();
    profiler.start_timing("stream1");
    thread::sleep(Duration::from_millis(10));
    profiler.stop_timing("stream1");
    profiler
        .sample("stream1", "write", "chunk0", 1024, 512)
        .expect("sample");
    profiler.stop().expect("stop");

    let text = read_sample_file(&profiler.sample_path());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let row = fields(lines[1]);
    assert_eq!(&row[1..4], &["stream1", "write", "chunk0"]);
    assert_eq!(row[5], "1024");
    assert_eq!(row[6], "512");

    let time: f64 = row[0].parse().expect("time");
    assert!((time - before).abs() < 5.0, "time {time} vs {before}");
    let processing: f64 = row[4].parse().expect("processing time");
    assert!(processing >= 0.009, "processing {processing}");
    assert!(processing < 1.0, "processing {processing}");
}

#[test]
fn untimed_sample_is_stamped_now_with_zero_processing() {
    let dir = TempDir::new().expect("tempdir");
    let mut profiler = StorageProfiler::new("untimed", dir.path());
    profiler.start().expect("start");
    let before = now_seconds();
    profiler
        .sample("never-timed", "read", "header", 64, 64)
        .expect("sample");
    let after = now_seconds();
    profiler.stop().expect("stop");

    let text = read_sample_file(&profiler.sample_path());
    let row: Vec<String> = text
        .lines()
        .nth(1)
        .expect("record")
        .split('\t')
        .map(str::to_owned)
        .collect();
    assert_eq!(row[4], "0.000000");
    let time: f64 = row[0].parse().expect("time");
    assert!(time >= before - 0.001 && time <= after + 0.001);
}

#[test]
fn repeated_samples_share_timing_fields() {
    let dir = TempDir::new().expect("tempdir");
    let clock = ManualClock::new(1_600_000_000.0);
    let mut profiler =
        StorageProfiler::new("repeat", dir.path()).with_clock(Arc::new(clock.clone()));
    profiler.start().expect("start");
    profiler.start_timing("blob");
    clock.advance(Duration::from_micros(1_234));
    profiler.stop_timing("blob");
    for chunk in 0..3 {
        clock.advance(Duration::from_secs(1));
        profiler
            .sample("blob", "read", &format!("part{chunk}"), 10, 5)
            .expect("sample");
    }
    profiler.stop().expect("stop");

    let text = read_sample_file(&profiler.sample_path());
    let rows: Vec<Vec<&str>> = text.lines().skip(1).map(fields).collect();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row[0], "1600000000.000000");
        assert_eq!(row[4], "0.001234");
    }
}

#[test]
fn restarting_timing_resets_window() {
    let dir = TempDir::new().expect("tempdir");
    let clock = ManualClock::new(10.0);
    let mut profiler =
        StorageProfiler::new("reset", dir.path()).with_clock(Arc::new(clock.clone()));
    profiler.start().expect("start");

    profiler.start_timing("s");
    clock.advance(Duration::from_millis(30));
    profiler.stop_timing("s");
    profiler.sample("s", "write", "first", 1, 1).expect("sample");

    profiler.start_timing("s");
    clock.advance(Duration::from_millis(5));
    profiler.stop_timing("s");
    profiler.sample("s", "write", "second", 1, 1).expect("sample");
    profiler.stop().expect("stop");

    let text = read_sample_file(&profiler.sample_path());
    let rows: Vec<Vec<&str>> = text.lines().skip(1).map(fields).collect();
    assert_eq!(rows[0][0], "10.000000");
    assert_eq!(rows[0][4], "0.030000");
    assert_eq!(rows[1][0], "10.030000");
    assert_eq!(rows[1][4], "0.005000");
}

#[test]
fn empty_session_contains_only_header() {
    let dir = TempDir::new().expect("tempdir");
    let mut profiler = StorageProfiler::with_options(
        ProfilerOptions::new("empty")
            .output_dir(dir.path())
            .compression_level(9),
    );
    profiler.start().expect("start");
    profiler.stop().expect("stop");
    assert_eq!(read_sample_file(&profiler.sample_path()), FILE_HEADER);
}

#[test]
fn start_truncates_existing_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("storage-again.csv.gz");
    std::fs::write(&path, b"stale bytes that are not gzip").expect("seed file");

    let mut profiler = StorageProfiler::new("again", dir.path());
    profiler.start().expect("start");
    profiler.sample("a", "read", "x", 1, 1).expect("sample");
    profiler.stop().expect("stop");
    assert_eq!(read_sample_file(&path).lines().count(), 2);
}

#[test]
fn sample_after_stop_fails() {
    let dir = TempDir::new().expect("tempdir");
    let mut profiler = StorageProfiler::new("closed", dir.path());
    profiler.start().expect("start");
    profiler.stop().expect("stop");
    let err = profiler.sample("a", "read", "x", 1, 1).unwrap_err();
    assert!(matches!(err, ProfilerError::InvalidState { .. }));
}
