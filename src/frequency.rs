//! Symbol frequency counting.
//!
//! The parallel form gives each worker a private 256-entry table for its
//! chunk, then folds it into one shared table under a lock. The lock is
//! held only for the 256-entry merge, never for the scan.

use parking_lot::Mutex;

use crate::error::Result;
use crate::parallel::{chunk_ranges, Executor};

/// Number of distinct byte symbols.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count per byte symbol.
///
/// Symbols with a zero count are absent: [`iter`](Self::iter) and
/// [`len`](Self::len) only see symbols that occur in the input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `data` in a single linear scan.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add_bytes(data);
        table
    }

    /// Count `data` on the executor's workers.
    ///
    /// # Errors
    /// Returns `Error::WorkerPanicked` if a counting worker panics.
    pub fn count(data: &[u8], exec: &Executor) -> Result<Self> {
        let ranges = chunk_ranges(data.len(), exec.workers());
        if ranges.len() == 1 {
            return Ok(Self::from_bytes(data));
        }

        let shared = Mutex::new(Self::new());
        exec.fork_join("counting", &ranges, |i, range| {
            let local = Self::from_bytes(&data[range]);
            log::trace!("counting: chunk {i} saw {} symbols", local.len());
            shared.lock().merge(&local);
        })?;
        Ok(shared.into_inner())
    }

    fn add_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (dst, &src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += src;
        }
    }

    /// Count for `symbol`, 0 if absent.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols present.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True if no symbol has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counts; equals the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present symbols and their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
