//! File input and output around the pipeline.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::pipeline::{compress, PipelineConfig, StageTimings};

/// How input files are turned into the byte buffer that gets compressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Byte-exact contents of the file.
    #[default]
    Verbatim,
    /// Lines concatenated without their `\n` terminators.
    ///
    /// Any `\r` before a `\n` is kept, as a line reader splitting on `\n`
    /// would keep it.
    StripLineTerminators,
}

/// Read the input buffer from `path`.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be opened or read.
pub fn read_input(path: &Path, mode: InputMode) -> Result<Vec<u8>> {
    let mut data = fs::read(path)?;
    if mode == InputMode::StripLineTerminators {
        data.retain(|&b| b != b'\n');
    }
    Ok(data)
}

/// Write the packed bytes to `path`, replacing any existing file.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be created or written.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)?;
    Ok(())
}

/// Timings and sizes of a file-to-file run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Bytes fed to the pipeline (after terminator handling).
    pub input_len: usize,
    /// Bytes written.
    pub output_len: usize,
    /// Time to read the input.
    pub reading: Duration,
    /// Time to write the output.
    pub writing: Duration,
    /// In-memory pipeline stages.
    pub stages: StageTimings,
    /// Wall-clock time of the whole run.
    pub total: Duration,
}

impl FileReport {
    /// Run time excluding reading and writing.
    pub fn total_no_io(&self) -> Duration {
        self.stages.total()
    }
}

/// Read `input`, compress it, and write the packed bytes to `output`.
///
/// The output file is only created once compression has succeeded, so a
/// failing run (for example an empty input) leaves no output behind.
///
/// # Errors
/// Returns `Error::Io` on read or write failure, and any error from
/// [`compress`].
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    mode: InputMode,
) -> Result<FileReport> {
    let run_start = Instant::now();

    let start = Instant::now();
    let data = read_input(input, mode)?;
    let reading = start.elapsed();
    log::debug!("read {} bytes from {} in {reading:?}", data.len(), input.display());

    let compressed = compress(&data, config)?;

    let start = Instant::now();
    write_output(output, &compressed.bytes)?;
    let writing = start.elapsed();
    log::debug!(
        "wrote {} bytes to {} in {writing:?}",
        compressed.bytes.len(),
        output.display()
    );

    Ok(FileReport {
        input_len: data.len(),
        output_len: compressed.bytes.len(),
        reading,
        writing,
        stages: compressed.timings,
        total: run_start.elapsed(),
    })
}
