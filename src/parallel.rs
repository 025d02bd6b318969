//! Fork-join harness shared by the parallel stages.
//!
//! Every parallel stage follows the same shape: split the input into `nw`
//! contiguous chunks by length alone, run one task per chunk, block until
//! all tasks are done, then hand back the per-chunk results in chunk index
//! order. Completion order never leaks into the output.
//!
//! Partitioning is static (no work stealing between chunks). The last chunk
//! absorbs the remainder, so a skewed input can leave one worker with more
//! work than the rest.

use std::ops::Range;

use rayon::prelude::*;

use crate::error::{Error, Result};

/// How a stage's chunks are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// One linear scan on the calling thread.
    #[default]
    Sequential,
    /// One scoped OS thread per chunk, joined before the stage returns.
    Threads,
    /// A parallel-for over the chunk list on a pool of exactly `nw` threads.
    Pool,
}

impl Backend {
    /// Short name used on the command line and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sequential => "seq",
            Backend::Threads => "threads",
            Backend::Pool => "pool",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "seq" | "sequential" => Ok(Backend::Sequential),
            "threads" | "thread" => Ok(Backend::Threads),
            "pool" | "ff" => Ok(Backend::Pool),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

/// Split `len` items into `nw` contiguous ranges.
///
/// Each range holds `len / nw` items; the last one also takes the
/// remainder. When `nw > len` the leading ranges are empty.
pub fn chunk_ranges(len: usize, nw: usize) -> Vec<Range<usize>> {
    let nw = nw.max(1);
    let chunk = len / nw;
    (0..nw)
        .map(|i| {
            let start = i * chunk;
            let end = if i == nw - 1 { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// Split a byte-aligned bit count into `nw` ranges that never cut a byte.
///
/// The per-chunk size is `len / nw` rounded up to a multiple of 8, so
/// trailing ranges may be empty once the stream is used up.
pub fn aligned_chunk_ranges(len: usize, nw: usize) -> Vec<Range<usize>> {
    let nw = nw.max(1);
    let mut chunk = len / nw;
    if chunk % 8 != 0 {
        chunk += 8 - chunk % 8;
    }
    (0..nw)
        .map(|i| {
            let start = (i * chunk).min(len);
            let end = if i == nw - 1 {
                len
            } else {
                ((i + 1) * chunk).min(len)
            };
            start..end
        })
        .collect()
}

/// Runs the chunk tasks of a stage for a fixed backend and worker count.
///
/// Built once per pipeline run. For [`Backend::Pool`] it owns the rayon
/// pool, so every stage of the run reuses the same `nw` threads.
pub struct Executor {
    backend: Backend,
    workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl Executor {
    /// Create an executor for `workers` parallel tasks.
    ///
    /// # Errors
    /// Returns `Error::InvalidWorkerCount` if `workers` is 0, or
    /// `Error::ThreadPool` if the pool backend cannot spawn its threads.
    pub fn new(backend: Backend, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidWorkerCount(0));
        }
        let pool = match backend {
            Backend::Pool => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("huffpar-worker-{i}"))
                    .build()?,
            ),
            Backend::Sequential | Backend::Threads => None,
        };
        Ok(Self {
            backend,
            workers,
            pool,
        })
    }

    /// An executor that runs every stage as a single linear scan.
    pub fn sequential() -> Self {
        Self {
            backend: Backend::Sequential,
            workers: 1,
            pool: None,
        }
    }

    /// The backend this executor runs on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Number of chunks each stage is split into.
    ///
    /// Always 1 for the sequential backend.
    pub fn workers(&self) -> usize {
        match self.backend {
            Backend::Sequential => 1,
            Backend::Threads | Backend::Pool => self.workers,
        }
    }

    /// Run `task` once per range and return the results in range order.
    ///
    /// `task` receives the chunk index and its range. `stage` names the
    /// stage in logs and in `Error::WorkerPanicked`.
    pub fn fork_join<T, F>(
        &self,
        stage: &'static str,
        ranges: &[Range<usize>],
        task: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize, Range<usize>) -> T + Sync,
    {
        log::trace!(
            "{stage}: {} chunks on {} backend",
            ranges.len(),
            self.backend.name()
        );
        match (self.backend, &self.pool) {
            (Backend::Threads, _) => std::thread::scope(|scope| {
                let task = &task;
                let handles: Vec<_> = ranges
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, range)| scope.spawn(move || task(i, range)))
                    .collect();
                // Join every handle in spawn order before looking at any result;
                // an unjoined panicked thread would re-panic when the scope ends.
                let joined: Vec<std::thread::Result<T>> =
                    handles.into_iter().map(|h| h.join()).collect();
                joined
                    .into_iter()
                    .map(|r| r.map_err(|_| Error::WorkerPanicked(stage)))
                    .collect()
            }),
            (Backend::Pool, Some(pool)) => pool.install(|| {
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    ranges
                        .par_iter()
                        .enumerate()
                        .map(|(i, range)| task(i, range.clone()))
                        .collect::<Vec<T>>()
                }))
                .map_err(|_| Error::WorkerPanicked(stage))
            }),
            _ => Ok(ranges
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, range)| task(i, range))
                .collect()),
        }
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("backend", &self.backend)
            .field("workers", &self.workers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chunk_ranges_last_absorbs_remainder() {
        let ranges = chunk_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_chunk_ranges_more_workers_than_items() {
        let ranges = chunk_ranges(2, 5);
        assert_eq!(ranges.len(), 5);
        assert!(ranges[..4].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[4], 0..2);
    }

    #[test]
    fn test_aligned_ranges_never_split_a_byte() {
        // 40 bits / 3 = 13, rounded up to 16.
        let ranges = aligned_chunk_ranges(40, 3);
        assert_eq!(ranges, vec![0..16, 16..32, 32..40]);
    }

    #[test]
    fn test_aligned_ranges_clamp_past_the_end() {
        // 16 bits / 5 = 3, rounded up to 8: two full chunks, then nothing.
        let ranges = aligned_chunk_ranges(16, 5);
        assert_eq!(ranges, vec![0..8, 8..16, 16..16, 16..16, 16..16]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            Executor::new(Backend::Threads, 0),
            Err(Error::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn test_results_follow_chunk_order() {
        for backend in [Backend::Sequential, Backend::Threads, Backend::Pool] {
            let exec = Executor::new(backend, 4).unwrap();
            let ranges = chunk_ranges(100, exec.workers());
            let out = exec
                .fork_join("test", &ranges, |i, range| {
                    // Make early chunks finish last.
                    std::thread::sleep(std::time::Duration::from_millis(
                        (ranges.len() - i) as u64 * 5,
                    ));
                    range.start
                })
                .unwrap();
            let starts: Vec<usize> = ranges.iter().map(|r| r.start).collect();
            assert_eq!(out, starts, "backend {backend:?}");
        }
    }

    #[test]
    fn test_panicking_worker_aborts_stage() {
        for backend in [Backend::Threads, Backend::Pool] {
            let exec = Executor::new(backend, 2).unwrap();
            let ranges = chunk_ranges(4, 2);
            let res = exec.fork_join("boom", &ranges, |i, _| {
                if i == 1 {
                    panic!("worker failure");
                }
                i
            });
            assert!(matches!(res, Err(Error::WorkerPanicked("boom"))));
        }
    }

    #[test]
    fn test_several_panicking_workers_still_return_error() {
        for backend in [Backend::Threads, Backend::Pool] {
            let exec = Executor::new(backend, 3).unwrap();
            let ranges = chunk_ranges(9, 3);
            let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                exec.fork_join("counting", &ranges, |i, _| {
                    if i >= 1 {
                        panic!("worker {i} failed");
                    }
                    i
                })
            }));
            let res = res.expect("fork_join must not panic");
            assert!(matches!(res, Err(Error::WorkerPanicked("counting"))));
        }
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("seq".parse::<Backend>().unwrap(), Backend::Sequential);
        assert_eq!("threads".parse::<Backend>().unwrap(), Backend::Threads);
        assert_eq!("pool".parse::<Backend>().unwrap(), Backend::Pool);
        assert!("gpu".parse::<Backend>().is_err());
    }

    proptest! {
        #[test]
        fn prop_chunk_ranges_tile_input(len in 0usize..10_000, nw in 1usize..64) {
            let ranges = chunk_ranges(len, nw);
            prop_assert_eq!(ranges.len(), nw);
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                next = r.end;
            }
            prop_assert_eq!(next, len);
        }

        #[test]
        fn prop_aligned_ranges_tile_on_byte_boundaries(bytes in 0usize..2_000, nw in 1usize..64) {
            let len = bytes * 8;
            let ranges = aligned_chunk_ranges(len, nw);
            prop_assert_eq!(ranges.len(), nw);
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                prop_assert_eq!(r.start % 8, 0);
                prop_assert_eq!(r.len() % 8, 0);
                next = r.end;
            }
            prop_assert_eq!(next, len);
        }
    }
}
