//! Sequential baseline engine
//!
//! Runs the plain sequential kernels on the calling thread. Exists so the
//! parallel engines have an honest baseline under the same interface and
//! timing discipline.

use std::ops::AddAssign;
use std::time::Instant;

use num_traits::Num;

use crate::error::EngineError;
use crate::scan::{inclusive_scan_in_place, partial_sum};

use super::{Engine, ExecutionModel, ReduceRun, ScanRun};

/// Single-threaded engine; `workers()` is always 1.
#[derive(Debug, Default)]
pub struct SerialEngine;

impl SerialEngine {
    pub fn new() -> Self {
        SerialEngine
    }
}

impl<T> Engine<T> for SerialEngine
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    fn model(&self) -> ExecutionModel {
        ExecutionModel::Serial
    }

    fn workers(&self) -> usize {
        1
    }

    fn reduce(&self, input: &[T]) -> Result<ReduceRun<T>, EngineError> {
        let start = Instant::now();
        let total = partial_sum(input);
        Ok(ReduceRun {
            total,
            elapsed: start.elapsed(),
        })
    }

    fn scan(&self, input: &[T]) -> Result<ScanRun<T>, EngineError> {
        // The working copy is not part of the timed compute core
        let mut values = input.to_vec();
        let start = Instant::now();
        inclusive_scan_in_place(&mut values);
        let elapsed = start.elapsed();
        Ok(ScanRun { values, elapsed })
    }
}
