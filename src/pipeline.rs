//! The five-stage compression pipeline.
//!
//! ```text
//! input ─► count ─► build tree ─► derive codes ─► encode + pad ─► pack ─► bytes
//! ```
//!
//! Stages run strictly one after another; each one materializes its full
//! output before the next starts. Counting, encoding and packing fan out
//! over the configured workers; tree and code derivation are sequential.
//! The tree is dropped as soon as the code table exists.

use std::time::{Duration, Instant};

use crate::code::CodeTable;
use crate::encode::encode;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::pack::pack;
use crate::parallel::{Backend, Executor};
use crate::tree::CodingTree;

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker count `nw` for the parallel stages.
    pub workers: usize,
    /// How chunks are executed.
    pub backend: Backend,
}

impl PipelineConfig {
    /// Configuration for `workers` workers on `backend`.
    pub fn new(backend: Backend, workers: usize) -> Self {
        Self { workers, backend }
    }

    /// Configuration from a signed worker count, as read from a command line.
    ///
    /// # Errors
    /// Returns `Error::InvalidWorkerCount` carrying the given value if it is
    /// zero or negative.
    pub fn from_signed(backend: Backend, workers: isize) -> Result<Self> {
        match usize::try_from(workers) {
            Ok(n) if n > 0 => Ok(Self::new(backend, n)),
            _ => Err(Error::InvalidWorkerCount(workers)),
        }
    }

    /// Single-threaded configuration.
    pub fn sequential() -> Self {
        Self::new(Backend::Sequential, 1)
    }

    /// Check the configuration before a run.
    ///
    /// # Errors
    /// Returns `Error::InvalidWorkerCount` if `workers` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkerCount(0));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Wall-clock time spent in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Frequency counting.
    pub counting: Duration,
    /// Tree construction.
    pub tree: Duration,
    /// Code table derivation, including dropping the tree.
    pub codes: Duration,
    /// Bit-stream encoding and padding.
    pub encoding: Duration,
    /// Bit packing.
    pub packing: Duration,
}

impl StageTimings {
    /// Sum of all stages.
    pub fn total(&self) -> Duration {
        self.counting + self.tree + self.codes + self.encoding + self.packing
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone)]
pub struct Compressed {
    /// The packed byte stream.
    pub bytes: Vec<u8>,
    /// Code table the input was encoded with.
    pub codes: CodeTable,
    /// Encoded bits before padding.
    pub payload_bits: usize,
    /// Encoded bits after padding; always `bytes.len() * 8`.
    pub padded_bits: usize,
    /// Per-stage durations.
    pub timings: StageTimings,
}

/// Compress `input` with a static Huffman code.
///
/// # Errors
/// Returns `Error::InvalidWorkerCount` for a zero worker count,
/// `Error::EmptyInput` for an empty input, and any worker or pool failure
/// from the parallel stages. No stage runs after a failure.
pub fn compress(input: &[u8], config: &PipelineConfig) -> Result<Compressed> {
    config.validate()?;
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    let exec = Executor::new(config.backend, config.workers)?;
    let mut timings = StageTimings::default();

    let start = Instant::now();
    let freqs = FrequencyTable::count(input, &exec)?;
    timings.counting = start.elapsed();
    log::debug!(
        "counting: {} distinct symbols in {:?}",
        freqs.len(),
        timings.counting
    );

    let start = Instant::now();
    let tree = CodingTree::build(&freqs)?;
    timings.tree = start.elapsed();
    log::debug!("tree: depth {} in {:?}", tree.depth(), timings.tree);

    let start = Instant::now();
    let codes = CodeTable::from_tree(&tree);
    drop(tree);
    timings.codes = start.elapsed();
    log::debug!("codes: {} entries in {:?}", codes.len(), timings.codes);
    if log::log_enabled!(log::Level::Trace) {
        for (symbol, code) in codes.iter() {
            log::trace!("code {symbol:#04x} = {}", CodeTable::code_string(code));
        }
    }

    let start = Instant::now();
    let mut stream = encode(input, &codes, &exec)?;
    let payload_bits = stream.len();
    stream.pad_to_byte();
    timings.encoding = start.elapsed();
    log::debug!(
        "encoding: {payload_bits} bits (+{} padding) in {:?}",
        stream.len() - payload_bits,
        timings.encoding
    );

    let start = Instant::now();
    let bytes = pack(&stream, &exec)?;
    timings.packing = start.elapsed();
    log::debug!("packing: {} bytes in {:?}", bytes.len(), timings.packing);

    log::info!(
        "compressed {} -> {} bytes ({} backend, {} workers) in {:?}",
        input.len(),
        bytes.len(),
        config.backend.name(),
        exec.workers(),
        timings.total()
    );

    Ok(Compressed {
        padded_bits: stream.len(),
        bytes,
        codes,
        payload_bits,
        timings,
    })
}
