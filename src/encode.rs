//! Bit-stream encoding.
//!
//! Each worker maps its chunk of the input to a private bit sequence; the
//! sequences are concatenated in chunk order and zero-padded to a byte
//! boundary. Nothing marks symbol boundaries in the output, so chunk order
//! is the only thing keeping the stream decodable.

use crate::code::CodeTable;
use crate::error::{Error, Result};
use crate::parallel::{chunk_ranges, Executor};

/// An ordered bit sequence, one bit per byte (each element is 0 or 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<u8>,
}

impl BitStream {
    /// An empty stream.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Concatenate per-chunk bit sequences in the order given.
    pub fn concat(parts: Vec<Vec<u8>>) -> Self {
        let total = parts.iter().map(Vec::len).sum();
        let mut bits = Vec::with_capacity(total);
        for part in parts {
            bits.extend_from_slice(&part);
        }
        Self { bits }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if the stream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if the length is a multiple of 8.
    pub fn is_byte_aligned(&self) -> bool {
        self.bits.len() % 8 == 0
    }

    /// Append zero bits up to the next multiple of 8.
    ///
    /// Returns the number of bits appended (0 to 7).
    pub fn pad_to_byte(&mut self) -> usize {
        let padding = (8 - self.bits.len() % 8) % 8;
        self.bits.resize(self.bits.len() + padding, 0);
        padding
    }

    /// The bits as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }
}

impl From<Vec<u8>> for BitStream {
    fn from(bits: Vec<u8>) -> Self {
        Self { bits }
    }
}

/// Encode one chunk of symbols.
fn encode_chunk(data: &[u8], codes: &CodeTable) -> Result<Vec<u8>> {
    let mut bits = Vec::with_capacity(codes.encoded_len(data));
    for &s in data {
        let code = codes.get(s).ok_or(Error::UnknownSymbol(s))?;
        bits.extend_from_slice(code);
    }
    Ok(bits)
}

/// Encode `data` with `codes`, without padding.
///
/// # Errors
/// Returns `Error::UnknownSymbol` if a byte of `data` has no code, or
/// `Error::WorkerPanicked` if an encoding worker panics.
pub fn encode(data: &[u8], codes: &CodeTable, exec: &Executor) -> Result<BitStream> {
    let ranges = chunk_ranges(data.len(), exec.workers());
    let parts = exec.fork_join("encoding", &ranges, |i, range| {
        let part = encode_chunk(&data[range], codes);
        if let Ok(bits) = &part {
            log::trace!("encoding: chunk {i} produced {} bits", bits.len());
        }
        part
    })?;
    let parts = parts.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(BitStream::concat(parts))
}

/// Encode `data` with `codes` and pad the result to a byte boundary.
///
/// # Errors
/// Same as [`encode`].
pub fn encode_padded(data: &[u8], codes: &CodeTable, exec: &Executor) -> Result<BitStream> {
    let mut stream = encode(data, codes, exec)?;
    stream.pad_to_byte();
    Ok(stream)
}
