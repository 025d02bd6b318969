//! # Parallel static Huffman compression
//!
//! *Count, build a prefix code, re-encode, pack. Three of the four steps fan out.*
//!
//! ## Intuition First
//!
//! Frequent bytes should cost few bits and rare bytes many. Huffman's greedy
//! construction finds the best such code among all prefix-free codes: keep
//! merging the two rarest groups of symbols until one group remains, and read
//! each symbol's code off the path that leads to it.
//!
//! ## The Problem
//!
//! The code itself is tiny (at most 256 leaves), but the passes over the data
//! are not:
//! - **Counting** touches every input byte.
//! - **Encoding** touches every input byte and writes every output bit.
//! - **Packing** touches every output bit.
//!
//! Each of these splits cleanly into contiguous chunks. Counting needs a merge
//! step; encoding and packing only need their chunk outputs glued back together
//! in chunk order.
//!
//! ## Pipeline
//!
//! ```text
//! Stage                Parallel   Shared state
//! Frequency counting   yes        one table, merged under a lock
//! Tree building        no         -
//! Code derivation      no         -
//! Bit-stream encoding  yes        code table (read-only)
//! Bit packing          yes        -
//! ```
//!
//! Each stage is a barrier: the next stage starts only once every worker of
//! the previous one has joined.
//!
//! ## Failure Modes
//!
//! 1. **Empty input**: there is no tree; the pipeline fails with
//!    [`Error::EmptyInput`] instead of producing a degenerate code.
//! 2. **One distinct symbol**: the root is a leaf with no path; it gets the
//!    1-bit code `0`.
//! 3. **Skewed chunks**: partitioning is static, so the last worker absorbs the
//!    remainder and `nw` larger than the input leaves workers idle.
//!
//! ## Implementation Notes
//!
//! The packed output carries no header, code table, or length. Decoding it
//! needs the code table and the unpadded bit count from [`Compressed`].
//!
//! ```rust
//! use huffpar::{compress, Backend, PipelineConfig};
//!
//! let out = compress(b"aabbc", &PipelineConfig::new(Backend::Threads, 2))?;
//! assert_eq!(out.bytes.len(), 1);
//! # Ok::<(), huffpar::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod encode;
pub mod error;
pub mod frequency;
pub mod io;
pub mod pack;
pub mod parallel;
pub mod pipeline;
pub mod report;
pub mod tree;

pub use code::CodeTable;
pub use encode::BitStream;
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use io::{compress_file, FileReport, InputMode};
pub use parallel::{Backend, Executor};
pub use pipeline::{compress, Compressed, PipelineConfig, StageTimings};
pub use tree::{CodingTree, Node};
