use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Prefix of every storage sample file name.
pub const FILENAME_PREFIX: &str = "storage";

/// Suffix of every storage sample file name.
pub const FILENAME_SUFFIX: &str = ".csv.gz";

/// First line of every sample file.
pub const FILE_HEADER: &str =
    "Time\tName\tOperation\tDescription\tProcessing time\tData size\tCompressed data size\n";

/// Number of tab-separated fields in the header and in each record.
pub const FIELD_COUNT: usize = 7;

/// Builds `<dir>/storage-<identifier>.csv.gz`, or a bare file name when `dir`
/// is absent or empty.
pub fn sample_file_path(identifier: &str, dir: Option<&Path>) -> PathBuf {
    let filename = format!("{FILENAME_PREFIX}-{identifier}{FILENAME_SUFFIX}");
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(filename),
        _ => PathBuf::from(filename),
    }
}

/// One row of the sample file.
///
/// Floats render fixed-point with six decimals; sizes render as plain
/// decimals. Text fields are written verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageSample<'a> {
    /// Wall-clock seconds at which the sample's timing window began.
    pub time: f64,
    /// Profile name.
    pub name: &'a str,
    /// Operation, conventionally `read` or `write`.
    pub operation: &'a str,
    /// Free-form description of the data.
    pub description: &'a str,
    /// Accumulated processing time in seconds.
    pub processing_time: f64,
    /// Size of the data in bytes.
    pub data_size: u64,
    /// Size of the compressed data in bytes.
    pub compressed_data_size: u64,
}

impl StorageSample<'_> {
    /// Writes the row, newline included, as UTF-8 bytes.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.to_string().as_bytes())
    }
}

impl fmt::Display for StorageSample<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:.6}\t{}\t{}\t{}\t{:.6}\t{}\t{}",
            self.time,
            self.name,
            self.operation,
            self.description,
            self.processing_time,
            self.data_size,
            self.compressed_data_size
        )
    }
}
