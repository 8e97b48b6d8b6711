//! Shared-memory engine
//!
//! A fixed pool of P worker threads over one memory image. Each worker
//! reads and writes only its own partition slice and its own partial-result
//! slot, so the local phases need no locking; `par_chunks_mut` hands every
//! worker a disjoint `&mut` slice, which makes the no-aliasing claim a
//! compile-time fact rather than a convention. The only serial section is
//! the combine step between the two parallel regions, and the exit of each
//! parallel region is the synchronization barrier that makes partials
//! (respectively offsets) visible before the next phase starts.

use std::ops::AddAssign;
use std::time::{Duration, Instant};

use num_traits::Num;
use rayon::prelude::*;

use crate::error::EngineError;
use crate::partition::chunk_len;
use crate::scan::{exclusive_offsets, inclusive_scan_in_place, partial_sum};

use super::{Engine, ExecutionModel, ReduceRun, ScanRun};

/// Thread-pool engine. Workers share one memory image; partitions are
/// `ceil(n / workers)`-sized contiguous slices.
pub struct SharedEngine {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl SharedEngine {
    /// Build a dedicated pool of exactly `workers` threads.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| EngineError::Resource {
                rank: 0,
                reason: e.to_string(),
            })?;
        Ok(Self { pool, workers })
    }
}

impl<T> Engine<T> for SharedEngine
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    fn model(&self) -> ExecutionModel {
        ExecutionModel::Shared
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn reduce(&self, input: &[T]) -> Result<ReduceRun<T>, EngineError> {
        if input.is_empty() {
            return Ok(ReduceRun {
                total: T::zero(),
                elapsed: Duration::ZERO,
            });
        }
        let chunk = chunk_len(input.len(), self.workers);
        let run = self.pool.install(|| {
            let start = Instant::now();

            // Local phase: one partial per partition, written by its owner.
            // Collection order is chunk order, never completion order.
            let partials: Vec<T> = input.par_chunks(chunk).map(partial_sum).collect();

            // Combine: serial, O(P)
            let total = partial_sum(&partials);

            ReduceRun {
                total,
                elapsed: start.elapsed(),
            }
        });
        log::debug!(
            "shared reduce: n={} workers={} elapsed={:?}",
            input.len(),
            self.workers,
            run.elapsed
        );
        Ok(run)
    }

    fn scan(&self, input: &[T]) -> Result<ScanRun<T>, EngineError> {
        if input.is_empty() {
            return Ok(ScanRun {
                values: Vec::new(),
                elapsed: Duration::ZERO,
            });
        }
        let chunk = chunk_len(input.len(), self.workers);

        // Fresh working copy per call so repeated iterations start from the
        // canonical input; the copy is outside the timed region.
        let mut values = input.to_vec();

        let elapsed = self.pool.install(|| {
            let start = Instant::now();

            // Local phase: in-place inclusive scan of each partition; the
            // last element of each partition is that worker's partial.
            // Empty partitions contribute the additive identity.
            let partials: Vec<T> = values
                .par_chunks_mut(chunk)
                .map(|part| {
                    inclusive_scan_in_place(part);
                    part.last().copied().unwrap_or_else(T::zero)
                })
                .collect();

            // Combine: serial exclusive prefix over the partials. The
            // region exit above already guarantees every partial is
            // visible here.
            let offsets = exclusive_offsets(&partials);

            // Add-back: each worker folds its offset into its own slice.
            values
                .par_chunks_mut(chunk)
                .zip(offsets.par_iter())
                .for_each(|(part, &offset)| {
                    for v in part.iter_mut() {
                        *v += offset;
                    }
                });

            start.elapsed()
        });
        log::debug!(
            "shared scan: n={} workers={} elapsed={:?}",
            input.len(),
            self.workers,
            elapsed
        );
        Ok(ScanRun { values, elapsed })
    }
}
