//! Error types for the compression pipeline.

use thiserror::Error;

/// Error variants for pipeline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The input holds no symbols, so there is no tree to build.
    #[error("empty input: nothing to encode")]
    EmptyInput,

    /// The worker count is zero or negative.
    #[error("invalid worker count: {0} (must be at least 1)")]
    InvalidWorkerCount(isize),

    /// A symbol has no entry in the code table it is being encoded with.
    #[error("symbol {0:#04x} has no code")]
    UnknownSymbol(u8),

    /// The bit stream handed to the packer is not a whole number of bytes.
    #[error("bit stream of {0} bits is not byte aligned")]
    UnalignedBitStream(usize),

    /// A worker panicked during the named stage.
    #[error("worker panicked during {0}")]
    WorkerPanicked(&'static str),

    /// The worker pool could not be started.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An I/O error occurred while reading input or writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
