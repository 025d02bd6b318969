//! Bit packing.
//!
//! Groups a byte-aligned bit stream into bytes, most significant bit first.
//! Parallel chunks are cut on multiples of 8 bits so a byte is always
//! packed by exactly one worker.

use crate::encode::BitStream;
use crate::error::{Error, Result};
use crate::parallel::{aligned_chunk_ranges, Executor};

/// Pack whole bytes of `bits`; `bits.len()` must be a multiple of 8.
fn pack_chunk(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// Pack `stream` into bytes on the executor's workers.
///
/// # Errors
/// Returns `Error::UnalignedBitStream` if the stream has not been padded to
/// a byte boundary, or `Error::WorkerPanicked` if a packing worker panics.
pub fn pack(stream: &BitStream, exec: &Executor) -> Result<Vec<u8>> {
    if !stream.is_byte_aligned() {
        return Err(Error::UnalignedBitStream(stream.len()));
    }
    let bits = stream.as_slice();
    let ranges = aligned_chunk_ranges(bits.len(), exec.workers());
    let parts = exec.fork_join("packing", &ranges, |i, range| {
        log::trace!("packing: chunk {i} covers bits {range:?}");
        pack_chunk(&bits[range])
    })?;
    Ok(parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::Backend;
    use proptest::prelude::*;

    #[test]
    fn test_msb_first() {
        let stream = BitStream::from(vec![1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0]);
        let bytes = pack(&stream, &Executor::sequential()).unwrap();
        assert_eq!(bytes, vec![0x81, 0x60]);
    }

    #[test]
    fn test_unaligned_rejected() {
        let stream = BitStream::from(vec![1, 0, 1]);
        let res = pack(&stream, &Executor::sequential());
        assert!(matches!(res, Err(Error::UnalignedBitStream(3))));
    }

    #[test]
    fn test_empty_stream_packs_to_nothing() {
        let exec = Executor::new(Backend::Threads, 4).unwrap();
        assert!(pack(&BitStream::new(), &exec).unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_parallel_pack_matches_input_bytes(
            bytes in prop::collection::vec(any::<u8>(), 0..512),
            nw in 1usize..16,
        ) {
            let bits: Vec<u8> = bytes
                .iter()
                .flat_map(|&b| (0..8).rev().map(move |i| (b >> i) & 1))
                .collect();
            let stream = BitStream::from(bits);

            for backend in [Backend::Sequential, Backend::Threads, Backend::Pool] {
                let exec = Executor::new(backend, nw).unwrap();
                let packed = pack(&stream, &exec).unwrap();
                prop_assert_eq!(packed.len(), stream.len() / 8);
                prop_assert_eq!(&packed, &bytes);
            }
        }
    }
}
