//! Binary entry point for the storprof CLI.
#![forbid(unsafe_code)]

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use flate2::{write::GzEncoder, Compression};
use storprof::{logging::init_logging, Profiler, ProfilerOptions, StorageProfiler};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "storprof",
    version,
    about = "Record storage I/O samples to a compressed sample file",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "STORPROF_LOG",
        default_value = "warn",
        help = "Log filter directive"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive a synthetic chunked workload through the profiler.
    Record(RecordCmd),
}

#[derive(Args, Debug)]
struct RecordCmd {
    #[arg(long, help = "Session identifier used in the sample file name")]
    identifier: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory that receives the sample file")]
    output_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "TOML file with profiler options")]
    config: Option<PathBuf>,

    #[arg(long, help = "Gzip level for the sample file (0-9)")]
    compression_level: Option<u32>,

    #[arg(long, default_value_t = 8, help = "Number of chunks to process")]
    chunks: usize,

    #[arg(long, default_value_t = 4096, help = "Size of each chunk in bytes")]
    chunk_size: usize,

    #[arg(long, value_enum, default_value_t = OperationArg::Write, help = "Operation to record")]
    operation: OperationArg,

    #[arg(long, default_value = "chunks", help = "Profile name for the timed region")]
    profile: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OperationArg {
    Read,
    Write,
}

impl OperationArg {
    fn as_str(self) -> &'static str {
        match self {
            OperationArg::Read => "read",
            OperationArg::Write => "write",
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    match cli.command {
        Command::Record(cmd) => record(cmd),
    }
}

fn build_options(cmd: &RecordCmd) -> Result<ProfilerOptions, Box<dyn Error>> {
    let mut options = match &cmd.config {
        Some(path) => ProfilerOptions::load(path)?,
        None => ProfilerOptions::default(),
    };
    if let Some(identifier) = &cmd.identifier {
        options.identifier = identifier.clone();
    }
    if let Some(dir) = &cmd.output_dir {
        options.output_dir = Some(dir.clone());
    }
    if let Some(level) = cmd.compression_level {
        options.compression_level = level;
    }
    options.validate()?;
    Ok(options)
}

fn record(cmd: RecordCmd) -> Result<(), Box<dyn Error>> {
    let options = build_options(&cmd)?;
    let mut profiler = StorageProfiler::with_options(options);
    profiler.start()?;

    let operation = cmd.operation.as_str();
    for index in 0..cmd.chunks {
        let chunk = synthetic_chunk(index, cmd.chunk_size);
        profiler.start_timing(&cmd.profile);
        let compressed = compress(&chunk)?;
        profiler.stop_timing(&cmd.profile);
        profiler.sample(
            &cmd.profile,
            operation,
            &format!("chunk{index}"),
            chunk.len() as u64,
            compressed.len() as u64,
        )?;
    }
    profiler.stop()?;

    let path = profiler.sample_path();
    info!(path = %path.display(), chunks = cmd.chunks, "storprof.record.done");
    println!("{}", path.display());
    Ok(())
}

/// Compressible bytes that differ from chunk to chunk.
fn synthetic_chunk(index: usize, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| ((i / 16 + index) % 251) as u8)
        .collect()
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
